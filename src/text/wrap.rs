use crate::text::measure::TextMeasure;

/// Greedy word wrap.
///
/// Each word joins the current line when the line, with the word appended, still measures
/// `<= max_width`; otherwise it starts a new line. A word wider than `max_width` on its own
/// occupies its own line unbroken. Whitespace runs collapse to single spaces.
pub fn wrap_words(
    text: &str,
    max_width: f64,
    font_size: f64,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.width(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Distance between consecutive line tops.
pub fn line_spacing(font_size: f64, line_height: f64) -> f64 {
    font_size * line_height
}

/// How many of `total` lines are drawn in `available_height`.
///
/// Drawing stops at the first line whose top (`i * spacing`) would exceed the available
/// height. The first line is always drawn, so the last line may extend past the bottom.
pub fn lines_that_fit(total: usize, spacing: f64, available_height: f64) -> usize {
    (0..total)
        .take_while(|&i| i == 0 || i as f64 * spacing <= available_height)
        .count()
}

/// Height occupied by `lines` drawn lines: `(lines - 1) * spacing + font_size`, or zero.
pub fn block_height(lines: usize, font_size: f64, spacing: f64) -> f64 {
    if lines == 0 {
        0.0
    } else {
        (lines - 1) as f64 * spacing + font_size
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
