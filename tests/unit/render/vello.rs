use super::*;

#[path = "support.rs"]
mod support;
use support::*;

fn render(layout: &PageLayout, images: &ImageStore) -> FrameRGBA {
    VelloRenderer::new(RenderSettings::print(), None)
        .unwrap()
        .render(layout, images)
        .unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 3)
}

#[test]
fn background_and_shapes() {
    let mut layout = empty_layout();
    layout.elements = vec![
        shape("bottom", 50.0, 50.0, 40.0, 40.0, 1, "#FF0000"),
        shape("top", 70.0, 70.0, 40.0, 40.0, 2, "#00FF00"),
    ];
    let frame = render(&layout, &ImageStore::new());
    assert_eq!((frame.width, frame.height), (400, 200));
    assert!(close(frame.pixel(300, 150).unwrap(), [255, 255, 255, 255]));
    assert!(close(frame.pixel(38, 38).unwrap(), [255, 0, 0, 255]));
    assert!(close(frame.pixel(65, 65).unwrap(), [0, 255, 0, 255]));
}

#[test]
fn images_are_drawn_from_the_store() {
    let mut layout = empty_layout();
    layout.elements = vec![image("main_image", "blue", 250.0, 100.0, 100.0, 50.0)];
    let frame = render(&layout, &blue_store("blue"));
    let [r, _, b, a] = frame.pixel(250, 100).unwrap();
    assert!(b > 240 && r < 15 && a == 255);
    assert!(close(frame.pixel(205, 100).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn reused_renderer_draws_the_current_store_image() {
    let mut layout = empty_layout();
    layout.elements = vec![image("main_image", "art.png", 250.0, 100.0, 100.0, 50.0)];
    let mut renderer = VelloRenderer::new(RenderSettings::print(), None).unwrap();

    let first = renderer.render(&layout, &blue_store("art.png")).unwrap();
    let [r, _, b, _] = first.pixel(250, 100).unwrap();
    assert!(b > 240 && r < 15);

    let red = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
    let mut regenerated = ImageStore::new();
    regenerated.insert("art.png", PreparedImage::from_rgba_image(&red));
    let second = renderer.render(&layout, &regenerated).unwrap();
    assert!(close(second.pixel(250, 100).unwrap(), [255, 0, 0, 255]));
}

#[test]
fn missing_images_do_not_abort_the_page() {
    let mut layout = empty_layout();
    layout.elements = vec![
        image("main_image", "nowhere", 250.0, 100.0, 100.0, 50.0),
        shape("s", 50.0, 50.0, 20.0, 20.0, 3, "#FF0000"),
    ];
    let frame = render(&layout, &ImageStore::new());
    assert!(close(frame.pixel(50, 50).unwrap(), [255, 0, 0, 255]));
}

#[test]
fn rotation_turns_about_the_center() {
    let mut layout = empty_layout();
    let mut bar = shape("bar", 200.0, 100.0, 100.0, 10.0, 1, "#000000");
    bar.rotation = 90.0;
    layout.elements = vec![bar];
    let frame = render(&layout, &ImageStore::new());
    // Now a vertical bar.
    assert!(close(frame.pixel(200, 140).unwrap(), [0, 0, 0, 255]));
    assert!(close(frame.pixel(240, 100).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn text_without_font_falls_back_to_blocks() {
    let mut layout = empty_layout();
    layout.elements = vec![text("narration", "Hello there", 100.0, 100.0, 160.0, 60.0)];
    let frame = render(&layout, &ImageStore::new());
    let inked = (70..130)
        .flat_map(|y| (20..180).map(move |x| (x, y)))
        .filter(|&(x, y)| !is_white(frame.pixel(x, y).unwrap()))
        .count();
    assert!(inked > 0);
}

#[test]
fn element_transform_maps_box_corners() {
    let e = shape("s", 100.0, 50.0, 20.0, 10.0, 1, "#000000");
    let t = element_transform(&e);
    let p = t * kurbo::Point::new(0.0, 0.0);
    assert!((p.x - 90.0).abs() < 1e-9 && (p.y - 45.0).abs() < 1e-9);
}
