use super::*;

#[test]
fn decision_table_rows() {
    assert_eq!(choose_mode(CanonShot::Birdseye, 0), LayoutMode::Image70);
    assert_eq!(choose_mode(CanonShot::Birdseye, 40), LayoutMode::Image70);
    assert_eq!(choose_mode(CanonShot::Closeup, 30), LayoutMode::Closeup);
    assert_eq!(choose_mode(CanonShot::Low, 14), LayoutMode::FullBleed);
    assert_eq!(choose_mode(CanonShot::Low, 15), LayoutMode::Image70);
    assert_eq!(choose_mode(CanonShot::Wide, 10), LayoutMode::FullBleed);
    assert_eq!(choose_mode(CanonShot::Wide, 15), LayoutMode::Image70);
    assert_eq!(choose_mode(CanonShot::Medium, 16), LayoutMode::Image70);
    assert_eq!(choose_mode(CanonShot::Medium, 17), LayoutMode::Text70);
}

#[test]
fn mode_selection_is_total() {
    for shot in CanonShot::ALL {
        for words in 0..200 {
            let mode = choose_mode(shot, words);
            assert!(LayoutMode::ALL.contains(&mode));
            assert_ne!(mode, LayoutMode::Spread);
            assert_eq!(mode, choose_mode(shot, words));
        }
    }
}

#[test]
fn scale_table() {
    assert_eq!(scale_for(CanonShot::Closeup), 0.9);
    assert_eq!(scale_for(CanonShot::Birdseye), 0.25);
    assert_eq!(scale_for(CanonShot::Wide), 0.3);
    assert_eq!(scale_for(CanonShot::Medium), 0.55);
    assert_eq!(scale_for(CanonShot::Low), 0.6);
    for shot in CanonShot::ALL {
        let s = scale_for(shot);
        assert!(s > 0.0 && s <= 1.0);
    }
}

#[test]
fn unknown_descriptor_scale_defaults() {
    assert_eq!(scale_for_descriptor(Some("close-up")), 0.9);
    assert_eq!(scale_for_descriptor(Some("dutch tilt")), DEFAULT_CHARACTER_SCALE);
    assert_eq!(scale_for_descriptor(None), DEFAULT_CHARACTER_SCALE);
}

#[test]
fn font_size_tiers_stay_in_legible_range() {
    let mut prev = f64::INFINITY;
    for words in 0..60 {
        let size = font_size_for_words(words);
        assert!((42.0..=56.0).contains(&size));
        assert!(size <= prev);
        prev = size;
    }
    assert_eq!(font_size_for_words(3), 56.0);
    assert_eq!(font_size_for_words(100), 42.0);
}

#[test]
fn emotion_colours_fall_back_to_default() {
    assert_eq!(emotion_color(Some("Happy")), "#D9480F");
    assert_eq!(emotion_color(Some(" sleepy ")), "#5F3DC4");
    assert_eq!(emotion_color(Some("bewildered")), DEFAULT_TEXT_COLOR);
    assert_eq!(emotion_color(None), DEFAULT_TEXT_COLOR);
}

#[test]
fn word_count_splits_on_any_whitespace() {
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("   "), 0);
    assert_eq!(word_count("Hello  baby!\nGood\tnight"), 4);
}
