use crate::foundation::core::Rect;

/// Luma mask for inpainting around narration: white is editable, black protects the text.
///
/// `bounds` is grown by `padding` on every side and clipped to the image. Zero-area bounds
/// (nothing drawn) protect nothing.
pub fn text_protect_mask(width: u32, height: u32, bounds: &Rect, padding: f64) -> image::GrayImage {
    let mut mask = image::GrayImage::from_pixel(width, height, image::Luma([255]));
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return mask;
    }

    let grown = bounds.inset(-padding.max(0.0));
    let x0 = grown.x.floor().max(0.0) as u32;
    let y0 = grown.y.floor().max(0.0) as u32;
    let x1 = (grown.right().ceil().max(0.0) as u32).min(width);
    let y1 = (grown.bottom().ceil().max(0.0) as u32).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            mask.put_pixel(x, y, image::Luma([0]));
        }
    }
    mask
}
