use geolens_core::classify::{accepted_extensions, classify, extension, DisplayMode};
use geolens_core::file::SelectedFile;

#[test]
fn test_raster_suffixes() {
    assert_eq!(classify("scene.tiff"), DisplayMode::RasterOverlay);
    assert_eq!(classify("scene.geotiff"), DisplayMode::RasterOverlay);
}

#[test]
fn test_image_suffixes() {
    for name in ["a.jpg", "a.jpeg", "a.png"] {
        assert_eq!(classify(name), DisplayMode::ZoomImage, "{name}");
    }
}

#[test]
fn test_suffix_is_case_insensitive() {
    assert_eq!(classify("SCENE.TIFF"), DisplayMode::RasterOverlay);
    assert_eq!(classify("Photo.JpEg"), DisplayMode::ZoomImage);
}

#[test]
fn test_only_last_segment_counts() {
    assert_eq!(classify("archive.tiff.zip"), DisplayMode::Unsupported);
    assert_eq!(classify("harbor.v2.png"), DisplayMode::ZoomImage);
}

#[test]
fn test_tif_and_unknown_are_unsupported() {
    assert_eq!(classify("scene.tif"), DisplayMode::Unsupported);
    assert_eq!(classify("notes.txt"), DisplayMode::Unsupported);
    assert!(!classify("notes.txt").is_supported());
}

#[test]
fn test_no_dot_is_unsupported() {
    assert_eq!(extension("README"), None);
    assert_eq!(classify("README"), DisplayMode::Unsupported);
}

#[test]
fn test_trailing_dot_is_unsupported() {
    assert_eq!(extension("scene."), Some(String::new()));
    assert_eq!(classify("scene."), DisplayMode::Unsupported);
}

#[test]
fn test_classification_depends_only_on_name() {
    let a = SelectedFile::from_bytes("x.png", vec![1u8, 2, 3]);
    let b = SelectedFile::from_bytes("x.png", Vec::<u8>::new());
    assert_eq!(a.display_mode(), b.display_mode());
}

#[test]
fn test_accepted_extensions_cover_every_mode() {
    let exts = accepted_extensions();
    assert_eq!(exts, vec!["tiff", "geotiff", "jpg", "jpeg", "png"]);
    for ext in exts {
        assert!(classify(&format!("f.{ext}")).is_supported());
    }
}
