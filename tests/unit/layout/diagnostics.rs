use super::*;
use crate::layout::model::{ElementKind, ShapeMask, TextAlign, TextStyle};

fn image_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> LayoutElement {
    LayoutElement {
        id: id.to_string(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        z_index: 2,
        kind: ElementKind::Image {
            url: "a.png".to_string(),
        },
    }
}

fn text_at(id: &str, x: f64, y: f64, w: f64, h: f64) -> LayoutElement {
    LayoutElement {
        id: id.to_string(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        z_index: 3,
        kind: ElementKind::Text {
            content: "hi".to_string(),
            style: TextStyle {
                font_family: "Andika".to_string(),
                font_size: 48.0,
                align: TextAlign::Center,
                color: "#000000".to_string(),
                line_height: 1.3,
                background_color: None,
                padding: None,
                shadow: None,
                letter_spacing: None,
            },
        },
    }
}

fn plaque_at(x: f64, y: f64, w: f64, h: f64) -> LayoutElement {
    LayoutElement {
        id: TEXT_PLAQUE_ID.to_string(),
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        z_index: 1,
        kind: ElementKind::Shape {
            mask: ShapeMask::RoundedRect,
            fill: "#FFFFFFD1".to_string(),
            corner_radius: 32.0,
        },
    }
}

#[test]
fn overlapping_image_and_text_collide() {
    // Image spans x 0..200, text spans x 150..350: 50px overlap.
    let elements = vec![
        image_at("main_image", 100.0, 100.0, 200.0, 100.0),
        text_at(NARRATION_ID, 250.0, 100.0, 200.0, 100.0),
    ];
    assert!(has_collision(&elements));
    assert_eq!(
        colliding_pairs(&elements),
        vec![("main_image".to_string(), NARRATION_ID.to_string())]
    );
}

#[test]
fn plaque_and_narration_overlap_is_expected() {
    let elements = vec![
        plaque_at(500.0, 500.0, 300.0, 200.0),
        text_at(NARRATION_ID, 500.0, 500.0, 250.0, 150.0),
        image_at("main_image", 100.0, 100.0, 100.0, 100.0),
    ];
    assert!(!has_collision(&elements));
}

#[test]
fn plaque_still_collides_with_image() {
    let elements = vec![
        plaque_at(150.0, 100.0, 100.0, 100.0),
        image_at("main_image", 100.0, 100.0, 100.0, 100.0),
    ];
    assert!(has_collision(&elements));
}

#[test]
fn touching_elements_do_not_collide() {
    let elements = vec![
        image_at("a", 50.0, 50.0, 100.0, 100.0),
        image_at("b", 150.0, 50.0, 100.0, 100.0),
    ];
    assert!(!has_collision(&elements));
}

#[test]
fn violations_name_each_breached_edge() {
    let safe = Rect::new(10.0, 10.0, 100.0, 100.0);
    let elements = vec![
        image_at("inside", 60.0, 60.0, 50.0, 50.0),
        image_at("corner", 5.0, 5.0, 20.0, 20.0),
        image_at("huge", 60.0, 60.0, 400.0, 400.0),
    ];
    assert_eq!(
        safe_area_violations(&elements, &safe),
        vec![
            "corner: left, top".to_string(),
            "huge: left, right, top, bottom".to_string(),
        ]
    );
}

#[test]
fn diagnose_flags_empty_pages() {
    let info = diagnose(&[], &Rect::new(0.0, 0.0, 10.0, 10.0));
    assert!(info.degenerate);
    assert!(!info.collision_checks);
    assert!(info.safe_area_violations.is_empty());
}
