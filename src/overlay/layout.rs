//! Pure layout math for the composed image: output size, cover crop,
//! panel and badge placement. Everything here is side-effect free so the
//! numbers can be checked without touching pixels.

use super::OverlayError;

/// Output canvas, portrait. Every composition renders at exactly this size.
pub const TARGET_WIDTH: u32 = 960;
pub const TARGET_HEIGHT: u32 = 1280;

/// Fixed inset between the map thumbnail and the panel, in canvas pixels.
pub const CONTENT_PADDING: f32 = 15.0;

pub const PANEL_RADIUS: f32 = 10.0;
pub const BADGE_RADIUS: f32 = 12.0;

/// Extra vertical gap under each panel line, cumulative per line index.
const LINE_GAPS: [f32; 5] = [0.0, 5.0, 10.0, 15.0, 25.0];

/// Source-space region of the photo that survives the cover fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Largest centered region of `src_w x src_h` with the canvas aspect ratio.
///
/// Wider-than-canvas photos keep their full height and lose the sides,
/// taller photos keep their full width and lose top and bottom. Callers
/// must reject zero dimensions first.
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CropRect {
    let src_w = src_w as f32;
    let src_h = src_h as f32;
    let src_aspect = src_w / src_h;
    let dst_aspect = dst_w as f32 / dst_h as f32;

    if src_aspect > dst_aspect {
        let w = src_h * dst_aspect;
        CropRect {
            x: (src_w - w) / 2.0,
            y: 0.0,
            w,
            h: src_h,
        }
    } else {
        let h = src_w / dst_aspect;
        CropRect {
            x: 0.0,
            y: (src_h - h) / 2.0,
            w: src_w,
            h,
        }
    }
}

/// Placement of the bottom strip: map thumbnail on the left, rounded text
/// panel filling the rest of the row.
///
/// All fields are canvas-space pixels, kept as `f32` until rasterization.
#[derive(Clone, Copy, Debug)]
pub struct PanelGeometry {
    /// Top edge shared by the map thumbnail and the panel.
    pub box_y: f32,
    /// Height of the strip; also the side length of the map square.
    pub box_height: f32,
    /// Scale-derived inset used around the map and inside the panel.
    pub map_padding: f32,
    pub map_x: f32,
    pub map_y: f32,
    pub map_size: f32,
    pub panel_x: f32,
    pub panel_width: f32,
    /// Left edge of the text column inside the panel.
    pub text_x: f32,
    /// Top reference for the first line's baseline.
    pub text_y: f32,
    pub title_px: f32,
    pub body_px: f32,
}

impl PanelGeometry {
    pub fn compute(canvas_w: u32, canvas_h: u32) -> Result<Self, OverlayError> {
        if canvas_w == 0 || canvas_h == 0 {
            return Err(OverlayError::DegenerateGeometry(format!(
                "canvas {canvas_w}x{canvas_h} has a zero dimension"
            )));
        }
        let wf = canvas_w as f32;
        let hf = canvas_h as f32;

        let margin_bottom = 0.01 * hf;
        let box_height = 0.165 * hf;
        let box_y = hf - box_height - margin_bottom;
        let map_padding = 0.05 * box_height;

        let panel_x = box_height + map_padding + CONTENT_PADDING;
        let panel_width = wf - panel_x;
        if panel_width <= 0.0 {
            return Err(OverlayError::DegenerateGeometry(format!(
                "canvas {canvas_w}x{canvas_h} leaves {panel_width:.1}px for the text panel"
            )));
        }

        Ok(Self {
            box_y,
            box_height,
            map_padding,
            map_x: map_padding,
            map_y: box_y,
            map_size: box_height,
            panel_x,
            panel_width,
            text_x: panel_x + map_padding,
            text_y: box_y + 1.5 * map_padding,
            title_px: 0.045 * panel_width,
            body_px: 0.035 * panel_width,
        })
    }

    /// Baseline of panel line `line` (0 = title, 1..4 = body lines).
    /// Indexes past the table keep the last gap.
    pub fn line_baseline(&self, line: usize) -> f32 {
        let gap = LINE_GAPS[line.min(LINE_GAPS.len() - 1)];
        self.text_y + self.title_px + self.body_px * line as f32 + gap
    }
}

/// Placement of the branding badge above the panel's right end.
///
/// The badge hugs its label, so it can only be computed once the label has
/// been measured at [`BadgeGeometry::label_font_px`].
#[derive(Clone, Copy, Debug)]
pub struct BadgeGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub icon_size: f32,
    pub font_px: f32,
}

impl BadgeGeometry {
    /// Font size the badge label must be measured at.
    pub fn label_font_px(panel: &PanelGeometry) -> f32 {
        0.08 * panel.box_height
    }

    pub fn compute(canvas_w: u32, panel: &PanelGeometry, label_width: f32) -> Self {
        let font_px = Self::label_font_px(panel);
        let icon_size = 1.2 * font_px;
        let width = icon_size + 10.0 + label_width + 20.0;
        let height = icon_size + 10.0;
        Self {
            x: canvas_w as f32 - width - panel.map_padding,
            y: panel.box_y - height + 10.0,
            width,
            height,
            icon_size,
            font_px,
        }
    }

    /// Top-left corner of the icon slot, vertically centered in the badge.
    pub fn icon_pos(&self) -> (f32, f32) {
        (self.x + 10.0, self.y + (self.height - self.icon_size) / 2.0)
    }

    pub fn label_x(&self) -> f32 {
        self.x + self.icon_size + 20.0
    }

    pub fn label_baseline(&self) -> f32 {
        self.y + self.font_px + (self.height - self.font_px) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) {
        assert!((a - b).abs() < 0.01, "{a} != {b}");
    }

    #[test]
    fn cover_crop_wide_photo_trims_sides() {
        let crop = cover_crop(2000, 1000, TARGET_WIDTH, TARGET_HEIGHT);
        close(crop.x, 625.0);
        close(crop.y, 0.0);
        close(crop.w, 750.0);
        close(crop.h, 1000.0);
    }

    #[test]
    fn cover_crop_tall_photo_trims_top_and_bottom() {
        let crop = cover_crop(600, 1600, TARGET_WIDTH, TARGET_HEIGHT);
        close(crop.x, 0.0);
        close(crop.w, 600.0);
        close(crop.h, 800.0);
        close(crop.y, 400.0);
    }

    #[test]
    fn cover_crop_matching_aspect_is_identity() {
        let crop = cover_crop(960, 1280, TARGET_WIDTH, TARGET_HEIGHT);
        close(crop.x, 0.0);
        close(crop.y, 0.0);
        close(crop.w, 960.0);
        close(crop.h, 1280.0);
    }

    #[test]
    fn panel_geometry_reference_canvas() {
        let p = PanelGeometry::compute(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        close(p.box_height, 211.2);
        close(p.box_y, 1056.0);
        close(p.map_padding, 10.56);
        close(p.map_x, 10.56);
        close(p.map_y, 1056.0);
        close(p.map_size, 211.2);
        close(p.panel_x, 236.76);
        close(p.panel_width, 723.24);
        close(p.text_x, 247.32);
        close(p.text_y, 1071.84);
        close(p.title_px, 32.5458);
        close(p.body_px, 25.3134);
    }

    #[test]
    fn line_baselines_are_strictly_descending_down_the_panel() {
        let p = PanelGeometry::compute(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        for line in 1..5 {
            assert!(p.line_baseline(line) > p.line_baseline(line - 1));
        }
        // last baseline stays inside the strip
        assert!(p.line_baseline(4) < p.box_y + p.box_height);
    }

    #[test]
    fn line_baseline_saturates_the_gap_table_instead_of_panicking() {
        let p = PanelGeometry::compute(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        // past the last line only the per-line advance grows
        close(p.line_baseline(5) - p.line_baseline(4), p.body_px);
        close(p.line_baseline(9) - p.line_baseline(8), p.body_px);
    }

    #[test]
    fn zero_canvas_is_rejected() {
        assert!(PanelGeometry::compute(0, 1280).is_err());
        assert!(PanelGeometry::compute(960, 0).is_err());
    }

    #[test]
    fn narrow_canvas_with_no_panel_room_is_rejected() {
        // At h=1280 the map strip plus padding eats ~236.8px.
        assert!(PanelGeometry::compute(200, 1280).is_err());
        assert!(PanelGeometry::compute(240, 1280).is_ok());
    }

    #[test]
    fn badge_is_right_aligned_to_the_map_padding() {
        let p = PanelGeometry::compute(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        for label_width in [0.0, 37.5, 120.0, 400.0] {
            let b = BadgeGeometry::compute(TARGET_WIDTH, &p, label_width);
            close(b.x + b.width + p.map_padding, TARGET_WIDTH as f32);
        }
    }

    #[test]
    fn badge_reference_numbers() {
        let p = PanelGeometry::compute(TARGET_WIDTH, TARGET_HEIGHT).unwrap();
        close(BadgeGeometry::label_font_px(&p), 16.896);
        let b = BadgeGeometry::compute(TARGET_WIDTH, &p, 150.0);
        close(b.icon_size, 20.2752);
        close(b.height, 30.2752);
        close(b.width, 200.2752);
        // overlaps the panel's top edge by 10px minus its own height
        close(b.y, 1056.0 - 30.2752 + 10.0);
        let (ix, iy) = b.icon_pos();
        close(ix, b.x + 10.0);
        close(iy, b.y + 5.0);
        assert!(b.label_baseline() > b.y && b.label_baseline() < b.y + b.height);
    }
}
