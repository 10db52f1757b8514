use super::*;

fn measure() -> FixedAdvance {
    FixedAdvance::new(0.5)
}

#[test]
fn lines_are_aligned_within_the_box() {
    // 10px font: 5px per character.
    let block = layout_text_block("ab", 10.0, 1.5, TextAlign::Center, 100.0, 100.0, &mut measure());
    assert_eq!(block.lines.len(), 1);
    assert_eq!(block.lines[0].x, 45.0);

    let right = layout_text_block("ab", 10.0, 1.5, TextAlign::Right, 100.0, 100.0, &mut measure());
    assert_eq!(right.lines[0].x, 90.0);

    let left = layout_text_block("ab", 10.0, 1.5, TextAlign::Left, 100.0, 100.0, &mut measure());
    assert_eq!(left.lines[0].x, 0.0);
}

#[test]
fn overflowing_lines_are_dropped() {
    // Each word gets its own line; tops at 0, 20, 40, ...
    let block = layout_text_block(
        "aaaa bbbb cccc dddd",
        10.0,
        2.0,
        TextAlign::Left,
        20.0,
        35.0,
        &mut measure(),
    );
    assert_eq!(block.total, 4);
    assert_eq!(block.lines.len(), 2);
    assert!(block.truncated());
    assert_eq!(block.lines[1].top, 20.0);
    assert_eq!(block.height(), 30.0);
}

#[test]
fn empty_text_has_zero_height() {
    let block = layout_text_block("  ", 10.0, 2.0, TextAlign::Left, 20.0, 35.0, &mut measure());
    assert!(block.lines.is_empty());
    assert_eq!(block.height(), 0.0);
    assert!(!block.truncated());
}

#[test]
fn block_glyphs_skip_spaces() {
    let rects = block_glyph_rects("a b", 0.0, 0.0, 10.0, 5.0);
    assert_eq!(rects.len(), 2);
    assert_eq!(rects[0].x, 0.5);
    assert_eq!(rects[1].x, 10.5);
    assert_eq!(rects[0].y, 2.5);
}

#[test]
fn painter_without_font_measures_with_fixed_advance() {
    let mut painter = TextPainter::new(None).unwrap();
    assert!(!painter.has_font());
    assert!((painter.width("abcd", 10.0) - 22.0).abs() < 1e-9);
}
