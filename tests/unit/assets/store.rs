use super::*;
use crate::assets::decode::png_data_url;

fn red_data_url(w: u32, h: u32) -> String {
    png_data_url(&image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]))).unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("usandthen_store_{name}_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn normalize_rel_path_cleans_and_rejects_traversal() {
    assert_eq!(normalize_rel_path("a/./b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../secret.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn sources_are_classified() {
    let root = Path::new("/assets");
    assert_eq!(resolve_source("data:image/png;base64,AA==", root).unwrap(), ImageSource::Data);
    assert_eq!(resolve_source("https://x.test/a.png", root).unwrap(), ImageSource::Remote);
    assert_eq!(
        resolve_source("pages/1.png", root).unwrap(),
        ImageSource::File(PathBuf::from("/assets/pages/1.png"))
    );
    assert_eq!(
        resolve_source("file:///tmp/x.png", root).unwrap(),
        ImageSource::File(PathBuf::from("/tmp/x.png"))
    );
}

#[test]
fn prepare_loads_data_urls_and_files_and_skips_failures() {
    let dir = temp_dir("prepare");
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 255, 255]));
    img.save(dir.join("blue.png")).unwrap();

    let data = red_data_url(2, 2);
    let store = ImageStore::prepare(
        [data.as_str(), "blue.png", "missing.png", "https://x.test/a.png", "data:,junk"],
        &dir,
    );
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&data).map(|i| (i.width, i.height)), Some((2, 2)));
    assert_eq!(store.get("blue.png").map(|i| i.aspect_ratio()), Some(2.0));
    assert!(store.get("missing.png").is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn for_layout_reads_image_elements() {
    use crate::layout::engine::{LayoutEngine, PageRequest};

    let data = red_data_url(3, 3);
    let layout = LayoutEngine::default().generate(
        &PageRequest::new("b", 1)
            .illustration(data.clone())
            .narration("Hi"),
    );
    let store = ImageStore::for_layout(&layout, Path::new("."));
    assert_eq!(store.len(), 1);
    assert!(store.get(&data).is_some());
}

#[test]
fn short_ref_trims_data_payloads() {
    assert_eq!(short_ref("data:image/png;base64,AAAA"), "data:image/png;base64");
    assert_eq!(short_ref("a,b.png"), "a,b.png");
}
