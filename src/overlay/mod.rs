//! Overlay compositor. Takes a decoded photo plus the bundled map and icon
//! assets, cover-fits the photo onto a fixed portrait canvas, stamps the
//! location panel and the branding badge, and encodes the result as JPEG.

pub mod canvas;
pub mod content;
pub mod layout;

use image::RgbaImage;
use rand::Rng;
use thiserror::Error;

use self::canvas::{hex_color, measure_text, Canvas, FontSet, TextStyle};
use self::content::{Clock, OverlayContent};
use self::layout::{cover_crop, BadgeGeometry, PanelGeometry};

use crate::perf_scope;

/// Fill behind the panel and the badge.
const OVERLAY_FILL: &str = "#5d5d5b";
const TEXT_FILL: &str = "#ffffff";

/// Quality for the final JPEG pass.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Request photo bytes could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Geometry left no room to draw anything sensible.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// A bundled asset could not be read or decoded. Server-side, unlike
    /// [`OverlayError::Decode`].
    #[error("asset error: {0}")]
    Asset(String),
    #[error("font error: {0}")]
    Font(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Render the full composition and return the raw RGBA surface.
///
/// Draw order is fixed: photo, map thumbnail, panel, panel text, badge.
/// The badge comes last because its width depends on the measured label.
pub fn render<R: Rng>(
    photo: &RgbaImage,
    map_asset: &RgbaImage,
    icon_asset: &RgbaImage,
    fonts: &FontSet,
    overlay_content: &OverlayContent,
    rng: &mut R,
    clock: &dyn Clock,
) -> Result<RgbaImage, OverlayError> {
    let _perf = perf_scope!("overlay.render");

    for (name, img) in [
        ("photo", photo),
        ("map asset", map_asset),
        ("icon asset", icon_asset),
    ] {
        if img.width() == 0 || img.height() == 0 {
            return Err(OverlayError::DegenerateGeometry(format!(
                "{name} has a zero dimension"
            )));
        }
    }

    let mut surface = Canvas::new(layout::TARGET_WIDTH, layout::TARGET_HEIGHT)?;
    let panel = PanelGeometry::compute(surface.width(), surface.height())?;
    let fill = hex_color(OVERLAY_FILL)?;
    let white = hex_color(TEXT_FILL)?;

    let crop = cover_crop(photo.width(), photo.height(), surface.width(), surface.height());
    surface.draw_photo_cover(photo, crop);

    surface.draw_image_scaled(map_asset, panel.map_x, panel.map_y, panel.map_size, panel.map_size);
    surface.fill_rounded_rect(
        panel.panel_x,
        panel.box_y,
        panel.panel_width,
        panel.box_height,
        layout::PANEL_RADIUS,
        fill,
    );

    let title = TextStyle { font: &fonts.light, px: panel.title_px };
    let body = TextStyle { font: &fonts.regular, px: panel.body_px };
    surface.draw_text(&title, panel.text_x, panel.line_baseline(0), white, &overlay_content.location_lines[0]);
    surface.draw_text(&body, panel.text_x, panel.line_baseline(1), white, &overlay_content.location_lines[1]);
    surface.draw_text(&body, panel.text_x, panel.line_baseline(2), white, &overlay_content.location_lines[2]);
    surface.draw_text(&body, panel.text_x, panel.line_baseline(3), white, &content::coordinate_line(rng));
    surface.draw_text(
        &body,
        panel.text_x,
        panel.line_baseline(4),
        white,
        &content::timestamp_line(clock.now_utc()),
    );

    let label = TextStyle {
        font: &fonts.bold,
        px: BadgeGeometry::label_font_px(&panel),
    };
    let label_width = measure_text(&label, &overlay_content.badge_label);
    let badge = BadgeGeometry::compute(surface.width(), &panel, label_width);
    surface.fill_rounded_rect(badge.x, badge.y, badge.width, badge.height, layout::BADGE_RADIUS, fill);
    let (icon_x, icon_y) = badge.icon_pos();
    surface.draw_image_scaled(icon_asset, icon_x, icon_y, badge.icon_size, badge.icon_size);
    surface.draw_text(&label, badge.label_x(), badge.label_baseline(), white, &overlay_content.badge_label);

    Ok(surface.into_image())
}

/// Render and JPEG-encode in one go. Errors never yield partial output.
pub fn compose<R: Rng>(
    photo: &RgbaImage,
    map_asset: &RgbaImage,
    icon_asset: &RgbaImage,
    fonts: &FontSet,
    overlay_content: &OverlayContent,
    rng: &mut R,
    clock: &dyn Clock,
) -> Result<Vec<u8>, OverlayError> {
    let rendered = render(photo, map_asset, icon_asset, fonts, overlay_content, rng, clock)?;
    canvas::encode_jpeg(rendered, JPEG_QUALITY)
}
