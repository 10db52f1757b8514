use super::*;

#[path = "support.rs"]
mod support;
use support::*;

fn render(layout: &PageLayout, images: &ImageStore) -> FrameRGBA {
    BasicRenderer::new(RenderSettings::print())
        .render(layout, images)
        .unwrap()
}

#[test]
fn empty_layout_is_background_only() {
    let frame = render(&empty_layout(), &ImageStore::new());
    assert_eq!((frame.width, frame.height), (400, 200));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(399, 199), Some([255, 255, 255, 255]));
}

#[test]
fn shapes_are_drawn_in_z_order() {
    let mut layout = empty_layout();
    layout.elements = vec![
        shape("top", 60.0, 60.0, 40.0, 40.0, 5, "#00FF00"),
        shape("bottom", 50.0, 50.0, 40.0, 40.0, 1, "#FF0000"),
    ];
    let frame = render(&layout, &ImageStore::new());
    assert_eq!(frame.pixel(35, 35), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(60, 60), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(150, 150), Some([255, 255, 255, 255]));
}

#[test]
fn translucent_fill_blends_over_background() {
    let mut layout = empty_layout();
    layout.elements = vec![shape("veil", 50.0, 50.0, 20.0, 20.0, 1, "#00000080")];
    let frame = render(&layout, &ImageStore::new());
    let [r, g, b, a] = frame.pixel(50, 50).unwrap();
    assert_eq!(a, 255);
    assert!(r > 120 && r < 135 && r == g && g == b);
}

#[test]
fn images_fit_within_their_box() {
    let mut layout = empty_layout();
    // 2x2 image in a 100x50 box: drawn 50x50 centered.
    layout.elements = vec![image("main_image", "blue", 250.0, 100.0, 100.0, 50.0)];
    let frame = render(&layout, &blue_store("blue"));
    assert_eq!(frame.pixel(250, 100), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(228, 100), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(210, 100), Some([255, 255, 255, 255]));
}

#[test]
fn missing_images_are_skipped() {
    let mut layout = empty_layout();
    layout.elements = vec![
        image("main_image", "nowhere", 250.0, 100.0, 100.0, 50.0),
        shape("s", 50.0, 50.0, 20.0, 20.0, 3, "#FF0000"),
    ];
    let frame = render(&layout, &ImageStore::new());
    assert_eq!(frame.pixel(250, 100), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(50, 50), Some([255, 0, 0, 255]));
}

#[test]
fn text_draws_glyph_blocks_inside_its_box() {
    let mut layout = empty_layout();
    layout.elements = vec![text("narration", "Hello there", 100.0, 100.0, 160.0, 60.0)];
    let frame = render(&layout, &ImageStore::new());

    let mut inked = 0;
    for y in 0..200 {
        for x in 0..400 {
            if !is_white(frame.pixel(x, y).unwrap()) {
                assert!((20..180).contains(&x) && (70..130).contains(&y), "ink at {x},{y}");
                inked += 1;
            }
        }
    }
    assert!(inked > 0);
}

#[test]
fn preview_scale_shrinks_geometry() {
    let mut layout = empty_layout();
    layout.elements = vec![shape("s", 100.0, 100.0, 40.0, 40.0, 1, "#FF0000")];
    let frame = BasicRenderer::new(RenderSettings::preview(0.5))
        .render(&layout, &ImageStore::new())
        .unwrap();
    assert_eq!((frame.width, frame.height), (200, 100));
    assert_eq!(frame.pixel(50, 50), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(65, 50), Some([255, 255, 255, 255]));
}
