use super::*;
use crate::foundation::rng::page_seed;
use crate::layout::policy::DEFAULT_TEXT_COLOR;

const EIGHT_WORDS: &str = "The little fox ran across the snowy field";
const TWENTY_WORDS: &str = "Once upon a time there was a small bear who lived in a cave \
     beside the river with his grandmother and sister";

fn engine() -> LayoutEngine {
    LayoutEngine::default()
}

fn full_request(book: &str, page: u32) -> PageRequest {
    PageRequest::new(book, page)
        .narration(EIGHT_WORDS)
        .illustration("https://example.test/p1.png")
        .shot("medium")
}

// Edges touching the gutter within rounding are fine.
fn straddles(r: &Rect, gutter: &Rect) -> bool {
    r.x < gutter.right() - 1e-6 && r.right() > gutter.x + 1e-6
}

#[test]
fn medium_short_page_is_image_dominant() {
    let layout = engine().generate(&full_request("book-1", 1));
    assert_eq!(layout.mode, LayoutMode::Image70);
    assert_eq!(layout.shot, CanonShot::Medium);

    let ids: Vec<&str> = layout.elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![TEXT_PLAQUE_ID, MAIN_IMAGE_ID, NARRATION_ID]);

    let text = layout.element(NARRATION_ID).unwrap();
    let ElementKind::Text { content, style } = &text.kind else {
        panic!("narration must be text");
    };
    assert_eq!(content, EIGHT_WORDS);
    assert_eq!(style.font_size, 52.0);
    assert_eq!(style.font_family, NARRATION_FONT_FAMILY);
    assert_eq!(style.align, TextAlign::Center);
    assert_eq!(style.color, DEFAULT_TEXT_COLOR);
    assert_eq!(style.line_height, NARRATION_LINE_HEIGHT);
}

#[test]
fn generation_is_deterministic_and_seeded_by_book_and_page() {
    let req = full_request("book-1", 3);
    let a = engine().generate(&req);
    let b = engine().generate(&req);
    assert_eq!(a, b);
    assert_eq!(a.seed, page_seed("book-1", 3));

    let other = engine().generate(&full_request("book-1", 4));
    assert_ne!(a.seed, other.seed);
}

#[test]
fn long_medium_narration_is_text_dominant() {
    let req = full_request("b", 1).narration(TWENTY_WORDS);
    let layout = engine().generate(&req);
    assert_eq!(layout.mode, LayoutMode::Text70);
    let ElementKind::Text { style, .. } = &layout.element(NARRATION_ID).unwrap().kind else {
        panic!("narration must be text");
    };
    assert_eq!(style.font_size, 44.0);
}

#[test]
fn wide_short_page_goes_full_bleed_with_caption_on_right_page() {
    let req = full_request("b", 2).shot("establishing shot").narration("Snow fell");
    let layout = engine().generate(&req);
    assert_eq!(layout.mode, LayoutMode::FullBleed);

    let gutter = layout.gutter_area;
    let narration = layout.element(NARRATION_ID).unwrap().bounds();
    assert!(narration.x >= gutter.right());
    assert!(layout.element(TEXT_PLAQUE_ID).is_some());
}

#[test]
fn no_element_straddles_the_gutter() {
    let shots = ["wide", "medium", "close-up", "bird's eye", "low angle", "unknown"];
    for (i, shot) in shots.iter().enumerate() {
        for narration in ["Hi", EIGHT_WORDS, TWENTY_WORDS] {
            for mode in [None, Some(LayoutMode::Spread), Some(LayoutMode::Closeup)] {
                let mut req = full_request("gutter-book", i as u32).shot(*shot).narration(narration);
                req.mode_override = mode;
                let layout = engine().generate(&req);
                for e in &layout.elements {
                    assert!(
                        !straddles(&e.bounds(), &layout.gutter_area),
                        "{} straddles in {:?}",
                        e.id,
                        layout.mode
                    );
                }
            }
        }
    }
}

#[test]
fn jitter_and_rotation_stay_within_bounds() {
    for page in 0..20 {
        let layout = engine().generate(&full_request("jitter", page));
        let frames = crate::layout::frames::compute_frames(&layout.canvas, layout.mode, 1.0);

        let image = layout.element(MAIN_IMAGE_ID).unwrap();
        assert!(image.rotation.abs() <= IMAGE_JITTER_DEG);
        assert!((image.y - frames.image_frame.center_y()).abs() <= IMAGE_JITTER_PX);

        let text = layout.element(NARRATION_ID).unwrap();
        assert!(text.rotation.abs() <= TEXT_JITTER_DEG);

        let plaque = layout.element(TEXT_PLAQUE_ID).unwrap();
        assert_eq!(plaque.rotation, 0.0);
        assert!((text.y - plaque.y).abs() <= TEXT_JITTER_PX);
        assert!((text.x - plaque.x).abs() <= TEXT_JITTER_PX);
    }
}

#[test]
fn plaque_wraps_narration_with_padding() {
    let layout = engine().generate(&full_request("pad", 1));
    let plaque = layout.element(TEXT_PLAQUE_ID).unwrap();
    let text = layout.element(NARRATION_ID).unwrap();
    assert!((plaque.width - text.width - 2.0 * PLAQUE_PADDING).abs() < 1e-9);
    assert!((plaque.height - text.height - 2.0 * PLAQUE_PADDING).abs() < 1e-9);
    let ElementKind::Shape {
        mask,
        fill,
        corner_radius,
    } = &plaque.kind
    else {
        panic!("plaque must be a shape");
    };
    assert_eq!(*mask, ShapeMask::RoundedRect);
    assert_eq!(fill, PLAQUE_FILL);
    assert_eq!(*corner_radius, PLAQUE_RADIUS);
}

#[test]
fn missing_inputs_drop_elements() {
    let no_image = engine().generate(&PageRequest::new("b", 1).narration("Hello there"));
    assert!(no_image.element(MAIN_IMAGE_ID).is_none());
    assert!(no_image.element(NARRATION_ID).is_some());

    let no_text = engine().generate(
        &PageRequest::new("b", 1)
            .illustration("x.png")
            .narration("   "),
    );
    assert!(no_text.element(NARRATION_ID).is_none());
    assert!(no_text.element(TEXT_PLAQUE_ID).is_none());
    assert!(no_text.element(MAIN_IMAGE_ID).is_some());

    let empty = engine().generate(&PageRequest::new("b", 1));
    assert!(empty.elements.is_empty());
    assert!(empty.debug.degenerate);
    assert!(!empty.debug.collision_checks);
}

#[test]
fn emotion_colours_the_narration() {
    let layout = engine().generate(&full_request("b", 1).emotion("Joyful"));
    let ElementKind::Text { style, .. } = &layout.element(NARRATION_ID).unwrap().kind else {
        panic!("narration must be text");
    };
    assert_eq!(style.color, "#D9480F");
    assert_eq!(layout.emotion.as_deref(), Some("Joyful"));
}

#[test]
fn mode_override_wins_over_decision_table() {
    let layout = engine().generate(&full_request("b", 1).mode(LayoutMode::Closeup));
    assert_eq!(layout.mode, LayoutMode::Closeup);
    assert_eq!(layout.shot, CanonShot::Medium);
}

#[test]
fn unknown_shot_falls_back_to_medium() {
    let layout = engine().generate(&full_request("b", 1).shot("dutch tilt"));
    assert_eq!(layout.shot, CanonShot::Medium);
}

#[test]
fn template_defaults_when_blank() {
    let layout = engine().generate(&full_request("b", 1));
    assert_eq!(layout.template, "default");
    let named = engine().generate(&full_request("b", 1).template("storybook"));
    assert_eq!(named.template, "storybook");
}

#[test]
fn invalid_format_is_rejected() {
    let mut format = PrintFormat::SQUARE_SPREAD;
    format.width = 0.0;
    assert!(LayoutEngine::new(format).is_err());
    assert!(LayoutEngine::new(PrintFormat::SQUARE_SPREAD).is_ok());
}

#[test]
fn clear_gutter_moves_to_nearer_side() {
    let format = PrintFormat::SQUARE_SPREAD;
    assert!(clear_gutter(Rect::new(100.0, 0.0, 500.0, 100.0), &format).is_none());
    // Touching within rounding is not straddling.
    assert!(clear_gutter(Rect::new(1625.0, 0.0, 100.0 + 1e-9, 100.0), &format).is_none());

    // Mostly on the left: shifting left is cheaper.
    let moved = clear_gutter(Rect::new(1500.0, 0.0, 300.0, 100.0), &format).unwrap();
    assert_eq!(moved.right(), 1725.0);
    assert_eq!(moved.width, 300.0);

    // Centered on the binding: ties go right.
    let moved = clear_gutter(Rect::new(1700.0, 0.0, 200.0, 100.0), &format).unwrap();
    assert_eq!(moved.x, 1875.0);
}

#[test]
fn clear_gutter_narrows_rects_wider_than_a_half() {
    let format = PrintFormat::SQUARE_SPREAD;
    let moved = clear_gutter(Rect::new(75.0, 10.0, 3450.0, 100.0), &format).unwrap();
    assert_eq!(moved.x, 1875.0);
    assert_eq!(moved.right(), 3525.0);
    assert_eq!(moved.y, 10.0);
    assert_eq!(moved.height, 100.0);
}

#[test]
fn narrowed_images_keep_their_aspect() {
    let format = PrintFormat::SQUARE_SPREAD;
    let mut elements = vec![LayoutElement {
        id: MAIN_IMAGE_ID.to_string(),
        x: 1800.0,
        y: 900.0,
        width: 3000.0,
        height: 1500.0,
        rotation: 0.0,
        z_index: 2,
        kind: ElementKind::Image {
            url: "a.png".to_string(),
        },
    }];
    assert_eq!(repair_gutter(&mut elements, &format), 1);
    let e = &elements[0];
    assert!((e.width / e.height - 2.0).abs() < 1e-9);
    assert!(e.bounds().x >= 1875.0 - 1e-9);
}

// Gutter repair is a single x-only pass that never re-checks what it moves into. On a spread
// page the image and the plaque both start as the full safe area; when the image's jitter
// sends it right, repair parks it in the right half on top of the plaque. That overlap is
// left in place and only surfaces in the diagnostics.
#[test]
fn gutter_repair_does_not_resolve_collisions_it_creates() {
    let format = PrintFormat::default();
    let gutter = format.gutter_rect();
    let mut landed_on_plaque = 0;

    for page in 1..=20 {
        let req = full_request("spread-book", page).mode(LayoutMode::Spread);
        let layout = engine().generate(&req);
        assert_eq!(layout.mode, LayoutMode::Spread);
        for e in &layout.elements {
            assert!(!straddles(&e.bounds(), &gutter), "page {page}: {} straddles", e.id);
        }

        let image = layout.element(MAIN_IMAGE_ID).unwrap().bounds();
        let plaque = layout.element(TEXT_PLAQUE_ID).unwrap().bounds();
        assert!(plaque.x >= gutter.right() - 1e-6, "spread text frame clears to the right");
        if image.x >= gutter.right() - 1e-6 {
            landed_on_plaque += 1;
            assert!(image.intersects(&plaque), "page {page}");
            assert!(layout.debug.collision_checks, "page {page}");
        }

        // Another pass finds nothing to move, so the overlap is not repaired either.
        let mut again = layout.elements.clone();
        assert_eq!(repair_gutter(&mut again, &format), 0);
        assert_eq!(again, layout.elements);

        // Diagnostics only observe the emitted geometry.
        assert_eq!(diagnose(&layout.elements, &layout.safe_area), layout.debug);
    }

    // "spread-book-5" jitters its image right.
    assert!(landed_on_plaque > 0);
}
