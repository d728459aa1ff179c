use book_cover::*;
use book_format::{Binding, PageDimensions, catalog, page_dimensions};
use lopdf::Document;
use tempfile::NamedTempFile;

fn spec(name: &str, binding: Binding, page_count: usize) -> CoverSpec {
    CoverSpec {
        trim: *catalog().iter().find(|s| s.name == name).unwrap(),
        binding,
        page_count,
    }
}

fn sample_text() -> CoverText {
    CoverText::new("Sample Book", Some("A Novel".to_string()), "Jane Doe")
}

#[test]
fn test_cover_is_deterministic() {
    let spec = spec("US Letter", Binding::PerfectBound, 120);
    let first = render_cover(&sample_text(), &spec).unwrap();
    let second = render_cover(&sample_text(), &spec).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_subtitle_changes_cover() {
    let spec = spec("US Trade", Binding::PerfectBound, 120);
    let with = render_cover(&sample_text(), &spec).unwrap();
    let without = render_cover(&CoverText::new("Sample Book", None, "Jane Doe"), &spec).unwrap();
    assert_ne!(with.bytes, without.bytes);
}

#[test]
fn test_blank_subtitle_is_no_subtitle() {
    let text = CoverText::new("Sample Book", Some("   ".to_string()), "Jane Doe");
    assert_eq!(text.subtitle, None);
}

#[test]
fn test_wraparound_dimensions() {
    // 6x9 perfect bound, 444 pages: spine 1.06", bleed 0.125" each side
    let artifact = render_cover(&sample_text(), &spec("US Trade", Binding::PerfectBound, 444)).unwrap();
    assert!((artifact.spine_width_pt - 76.32).abs() < 0.01);
    assert!((artifact.width_pt - (2.0 * 432.0 + 76.32 + 18.0)).abs() < 0.01);
    assert!((artifact.height_pt - 666.0).abs() < 0.01);

    let doc = Document::load_mem(&artifact.bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let dims = page_dimensions(&doc, *pages.values().next().unwrap()).unwrap();
    assert!(dims.approx_eq(PageDimensions::new(artifact.width_pt, artifact.height_pt), 0.01));
}

#[test]
fn test_coil_binding_has_no_spine() {
    let artifact = render_cover(&sample_text(), &spec("US Letter", Binding::CoilBound, 120)).unwrap();
    assert_eq!(artifact.spine_width_pt, 0.0);
    assert!((artifact.width_pt - (2.0 * 612.0 + 18.0)).abs() < 0.01);
}

#[test]
fn test_geometry_panels_tile_the_spread() {
    let geometry = CoverGeometry::new(&spec("Digest", Binding::CaseWrap, 200));
    let back = geometry.back_panel();
    let spine = geometry.spine();
    let front = geometry.front_panel();
    assert_eq!(back.right(), spine.x);
    assert_eq!(spine.right(), front.x);
    assert!((front.right() + geometry.bleed - geometry.width()).abs() < 0.001);
    assert!((geometry.trim_box().width - (back.width + spine.width + front.width)).abs() < 0.001);
}

#[test]
fn test_empty_title_rejected() {
    let text = CoverText::new("  ", None, "Jane Doe");
    let result = render_cover(&text, &spec("US Trade", Binding::PerfectBound, 100));
    assert!(matches!(result, Err(CoverError::EmptyText { field: "title" })));
}

#[test]
fn test_empty_author_rejected() {
    let text = CoverText::new("Sample Book", None, "");
    let result = render_cover(&text, &spec("US Trade", Binding::PerfectBound, 100));
    assert!(matches!(result, Err(CoverError::EmptyText { field: "author" })));
}

#[test]
fn test_unencodable_text_rejected() {
    let text = CoverText::new("\u{6771}\u{4EAC}", None, "Jane Doe");
    match render_cover(&text, &spec("US Trade", Binding::PerfectBound, 100)) {
        Err(CoverError::Unencodable { field, ch }) => {
            assert_eq!(field, "title");
            assert_eq!(ch, '\u{6771}');
        }
        other => panic!("Expected Unencodable, got {:?}", other),
    }
}

#[test]
fn test_tabs_and_newlines_are_word_breaks() {
    let spec = spec("US Letter", Binding::PerfectBound, 120);
    let messy = CoverText::new("Sample\tBook", Some("A\nNovel".to_string()), "Jane  Doe\n");
    let clean = sample_text();

    let messy = render_cover(&messy, &spec).unwrap();
    let clean = render_cover(&clean, &spec).unwrap();
    assert_eq!(messy.bytes, clean.bytes);
}

#[test]
fn test_overlong_title_rejected() {
    let text = CoverText::new("word ".repeat(80), None, "Jane Doe");
    let result = render_cover(&text, &spec("US Trade", Binding::PerfectBound, 100));
    assert!(matches!(result, Err(CoverError::TextTooLong { field: "title" })));
}

#[test]
fn test_latin1_text_renders() {
    let text = CoverText::new("Cr\u{E8}me Br\u{FB}l\u{E9}e", None, "Ren\u{E9}e M\u{FC}ller");
    assert!(render_cover(&text, &spec("A5", Binding::PerfectBound, 64)).is_ok());
}

#[tokio::test]
async fn test_generate_and_save_cover() {
    let artifact = generate_cover(&sample_text(), &spec("US Letter", Binding::PerfectBound, 40))
        .await
        .unwrap();
    let temp = NamedTempFile::new().unwrap();
    save_cover(&artifact, temp.path()).await.unwrap();

    let on_disk = std::fs::read(temp.path()).unwrap();
    assert_eq!(on_disk, artifact.bytes);
}
