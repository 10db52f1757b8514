use crate::{
    foundation::core::{PrintFormat, Rect},
    layout::policy::LayoutMode,
};

/// Horizontal/vertical gap between the image and text frames.
pub const FRAME_GAP: f64 = 40.0;
/// Image width as a fraction of the safe width in `image70`.
pub const IMAGE70_IMAGE_FRACTION: f64 = 0.66;
/// Text height as a fraction of the safe height in `image70`.
pub const IMAGE70_TEXT_HEIGHT_FRACTION: f64 = 0.5;
/// Text width as a fraction of the safe width in `text70`.
pub const TEXT70_TEXT_FRACTION: f64 = 0.62;
/// Text height as a fraction of the safe height in `text70`.
pub const TEXT70_TEXT_HEIGHT_FRACTION: f64 = 0.6;
/// Image and band width as a fraction of the safe width in `closeup`.
pub const CLOSEUP_FRACTION: f64 = 0.85;
/// Height of the pinned text band (closeup) and caption overlay (fullBleed).
pub const TEXT_BAND_HEIGHT: f64 = 260.0;

/// Named regions for one page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frames {
    /// Region the illustration is placed in (before character scaling).
    pub image_frame: Rect,
    /// Region the narration is placed in, when the mode has one.
    pub text_frame: Option<Rect>,
    /// Canvas inset by the safe margin.
    pub safe_rect: Rect,
    /// Binding strip.
    pub gutter_rect: Rect,
}

/// Compute the frames for a layout mode and illustration aspect ratio (width / height).
///
/// Non-finite or non-positive aspect ratios are treated as square.
pub fn compute_frames(format: &PrintFormat, mode: LayoutMode, aspect: f64) -> Frames {
    let aspect = sanitize_aspect(aspect);
    let s = format.safe_rect();
    let gutter_rect = format.gutter_rect();

    let (image_frame, text_frame) = match mode {
        LayoutMode::FullBleed => (format.canvas_rect(), None),
        LayoutMode::Image70 => {
            let img_w = s.width * IMAGE70_IMAGE_FRACTION;
            let img_h = (img_w / aspect).min(s.height);
            let image = Rect::new(s.x, s.center_y() - img_h * 0.5, img_w, img_h);

            let text_x = image.right() + FRAME_GAP;
            let text_h = s.height * IMAGE70_TEXT_HEIGHT_FRACTION;
            let text = Rect::new(
                text_x,
                s.center_y() - text_h * 0.5,
                s.right() - text_x,
                text_h,
            );
            (image, Some(text))
        }
        LayoutMode::Text70 => {
            let text_w = s.width * TEXT70_TEXT_FRACTION;
            let text_h = s.height * TEXT70_TEXT_HEIGHT_FRACTION;
            let text = Rect::new(s.x, s.center_y() - text_h * 0.5, text_w, text_h);

            let img_x = text.right() + FRAME_GAP;
            let img_w = (s.right() - img_x).max(0.0);
            let img_h = (img_w / aspect).min(s.height);
            let image = Rect::new(img_x, s.center_y() - img_h * 0.5, img_w, img_h);
            (image, Some(text))
        }
        LayoutMode::Closeup => {
            let band_h = band_height(&s);
            let band_w = s.width * CLOSEUP_FRACTION;
            let band = Rect::new(
                s.center_x() - band_w * 0.5,
                s.bottom() - band_h,
                band_w,
                band_h,
            );

            let upper_top = s.y;
            let upper_h = (band.y - FRAME_GAP - upper_top).max(0.0);
            let img_w = s.width * CLOSEUP_FRACTION;
            let img_h = (img_w / aspect).min(upper_h);
            let image = Rect::new(
                s.center_x() - img_w * 0.5,
                upper_top + (upper_h - img_h) * 0.5,
                img_w,
                img_h,
            );
            (image, Some(band))
        }
        LayoutMode::Spread => (s, Some(s)),
    };

    Frames {
        image_frame,
        text_frame,
        safe_rect: s,
        gutter_rect,
    }
}

/// Caption band used for narration on full-bleed pages: bottom of the right-hand page.
pub fn caption_overlay_frame(format: &PrintFormat) -> Rect {
    let s = format.safe_rect();
    let x = format.gutter_rect().right() + FRAME_GAP;
    let h = band_height(&s);
    Rect::new(x, s.bottom() - h, s.right() - x, h)
}

fn band_height(safe: &Rect) -> f64 {
    TEXT_BAND_HEIGHT.min(safe.height * 0.25)
}

fn sanitize_aspect(aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/frames.rs"]
mod tests;
