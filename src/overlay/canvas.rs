//! Owned RGBA drawing surface plus the handful of raster operations the
//! compositor needs: cover-fit photo placement, opaque rounded rectangles,
//! alpha-blended image stamps and baseline-anchored text.

use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ExtendedColorType, ImageBuffer, ImageEncoder, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

use super::layout::CropRect;
use super::OverlayError;

/// Font choice plus pixel size for one run of text. Measurement and drawing
/// take the same style, so a label is always measured at the size it is
/// later drawn at.
pub struct TextStyle<'f> {
    pub font: &'f Font<'static>,
    pub px: f32,
}

/// The three overlay fonts, cheap to clone per request.
#[derive(Clone)]
pub struct FontSet {
    /// Thin face used for the panel title line.
    pub light: Arc<Font<'static>>,
    /// Regular face used for the body lines.
    pub regular: Arc<Font<'static>>,
    /// Bold face used for the badge label.
    pub bold: Arc<Font<'static>>,
}

/// Advance-independent ink width of `text`: the rightmost rasterized pixel
/// across all glyph bounding boxes.
pub fn measure_text(style: &TextStyle<'_>, text: &str) -> f32 {
    let scale = Scale::uniform(style.px);
    let ascent = style.font.v_metrics(scale).ascent;
    style
        .font
        .layout(text, scale, point(0.0, ascent))
        .filter_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x as f32))
        .fold(0.0, f32::max)
}

/// Parse `#rrggbb` into an opaque pixel.
pub fn hex_color(code: &str) -> Result<Rgba<u8>, OverlayError> {
    let digits = code.trim().trim_start_matches('#');
    let bytes = hex::decode(digits)
        .map_err(|_| OverlayError::Internal(format!("bad color literal {code:?}")))?;
    if bytes.len() != 3 {
        return Err(OverlayError::Internal(format!("bad color literal {code:?}")));
    }
    Ok(Rgba([bytes[0], bytes[1], bytes[2], 255]))
}

pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Fresh opaque-black surface. Zero dimensions never produce a surface.
    pub fn new(width: u32, height: u32) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::DegenerateGeometry(format!(
                "surface {width}x{height} has a zero dimension"
            )));
        }
        Ok(Self {
            img: ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        })
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Sample `crop` out of `photo` and scale it over the whole surface.
    pub fn draw_photo_cover(&mut self, photo: &RgbaImage, crop: CropRect) {
        let cx = (crop.x.round() as u32).min(photo.width().saturating_sub(1));
        let cy = (crop.y.round() as u32).min(photo.height().saturating_sub(1));
        let cw = (crop.w.round() as u32).clamp(1, photo.width() - cx);
        let ch = (crop.h.round() as u32).clamp(1, photo.height() - cy);

        let view = imageops::crop_imm(photo, cx, cy, cw, ch).to_image();
        let scaled = imageops::resize(
            &view,
            self.img.width(),
            self.img.height(),
            imageops::FilterType::Lanczos3,
        );
        imageops::replace(&mut self.img, &scaled, 0, 0);
    }

    /// Solid rounded rectangle. The radius is clamped so the corner arcs
    /// never self-intersect; geometry snaps to whole pixels.
    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgba<u8>) {
        let w_i = w.round() as i32;
        let h_i = h.round() as i32;
        if w_i <= 0 || h_i <= 0 {
            return;
        }
        let x0 = x.round() as i32;
        let y0 = y.round() as i32;
        let r = (radius.round() as i32).clamp(0, w_i.min(h_i) / 2);

        for yy in 0..h_i {
            for xx in 0..w_i {
                if rounded_rect_contains(xx, yy, w_i, h_i, r) {
                    self.put_pixel_clipped(x0 + xx, y0 + yy, color);
                }
            }
        }
    }

    /// Scale `src` to `w x h` and alpha-blend it at `(x, y)`.
    pub fn draw_image_scaled(&mut self, src: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        let tw = (w.round() as i64).max(1) as u32;
        let th = (h.round() as i64).max(1) as u32;
        let scaled = imageops::resize(src, tw, th, imageops::FilterType::Lanczos3);

        let x0 = x.round() as i32;
        let y0 = y.round() as i32;
        for sy in 0..scaled.height() {
            for sx in 0..scaled.width() {
                let p = *scaled.get_pixel(sx, sy);
                self.blend_pixel_clipped(x0 + sx as i32, y0 + sy as i32, p);
            }
        }
    }

    /// Draw `text` with its baseline at `(x, baseline)`, blending glyph
    /// coverage into the surface.
    pub fn draw_text(&mut self, style: &TextStyle<'_>, x: f32, baseline: f32, color: Rgba<u8>, text: &str) {
        let scale = Scale::uniform(style.px);
        for glyph in style.font.layout(text, scale, point(x, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;
                    let a = (v * color.0[3] as f32) as u8;
                    if a > 0 {
                        self.blend_pixel_clipped(px, py, Rgba([color.0[0], color.0[1], color.0[2], a]));
                    }
                });
            }
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    fn put_pixel_clipped(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.img.width() && (y as u32) < self.img.height() {
            self.img.put_pixel(x as u32, y as u32, color);
        }
    }

    fn blend_pixel_clipped(&mut self, x: i32, y: i32, src: Rgba<u8>) {
        if x < 0 || y < 0 || x as u32 >= self.img.width() || y as u32 >= self.img.height() {
            return;
        }
        let a = src.0[3] as f32 / 255.0;
        if a <= 0.0 {
            return;
        }
        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        for c in 0..3 {
            let s = src.0[c] as f32;
            let d = dst.0[c] as f32;
            dst.0[c] = (s * a + d * (1.0 - a)) as u8;
        }
        dst.0[3] = 255;
    }
}

/// Whether local pixel `(x, y)` of a `w x h` rectangle survives corner
/// rounding with radius `r`.
fn rounded_rect_contains(x: i32, y: i32, w: i32, h: i32, r: i32) -> bool {
    if r <= 0 {
        return true;
    }
    let (cx, cy) = if x < r && y < r {
        (r - 1, r - 1)
    } else if x >= w - r && y < r {
        (w - r, r - 1)
    } else if x < r && y >= h - r {
        (r - 1, h - r)
    } else if x >= w - r && y >= h - r {
        (w - r, h - r)
    } else {
        return true;
    };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

/// Encode a finished surface as baseline JPEG, dropping the alpha channel.
pub fn encode_jpeg(img: RgbaImage, quality: u8) -> Result<Vec<u8>, OverlayError> {
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .write_image(&rgb, rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| OverlayError::Encode(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}
