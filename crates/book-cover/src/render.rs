//! Cover PDF rendering
//!
//! The cover is a single page: a full-bleed background, the title block and
//! author on the front panel, and the title and author along the spine when
//! the spine is wide enough to carry text.

use crate::constants::*;
use crate::geometry::{CoverGeometry, Rect};
use crate::text::{TextBlock, collapse_whitespace, encode_win_ansi, fit_block, text_width};
use crate::types::*;
use book_format::constants::{MIN_SPINE_TEXT_IN, POINTS_PER_INCH};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, StringFormat, Stream};
use std::path::Path;

// =============================================================================
// Public API
// =============================================================================

/// Render the cover off the async runtime
pub async fn generate_cover(text: &CoverText, spec: &CoverSpec) -> Result<CoverArtifact> {
    let text = text.clone();
    let spec = *spec;
    tokio::task::spawn_blocking(move || render_cover(&text, &spec)).await?
}

/// Write a rendered cover to disk
pub async fn save_cover(artifact: &CoverArtifact, path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), &artifact.bytes).await?;
    Ok(())
}

/// Render the cover. Identical inputs produce identical bytes.
pub fn render_cover(text: &CoverText, spec: &CoverSpec) -> Result<CoverArtifact> {
    let text = &CoverText {
        title: collapse_whitespace(&text.title),
        subtitle: text.subtitle.as_deref().map(collapse_whitespace),
        author: collapse_whitespace(&text.author),
    };
    let geometry = CoverGeometry::new(spec);
    let front = geometry.front_panel();
    let max_width = front.width - 2.0 * SAFE_MARGIN;

    let title = fit_block("title", &text.title, TITLE_FIT, true, max_width)?;
    let subtitle = match &text.subtitle {
        Some(subtitle) => Some(fit_block("subtitle", subtitle, SUBTITLE_FIT, false, max_width)?),
        None => None,
    };
    let author = fit_block("author", &text.author, AUTHOR_FIT, false, max_width)?;

    let mut ops = Vec::new();
    push_background(&mut ops, &geometry.media_box());
    push_front_panel(&mut ops, &front, &title, subtitle.as_ref(), &author)?;
    push_spine(&mut ops, &geometry, text)?;

    let content = Content { operations: ops }.encode()?;
    let bytes = build_document(&geometry, content, text)?;

    log::debug!(
        "Rendered cover {:.1} x {:.1} pt, spine {:.1} pt, title at {} pt",
        geometry.width(),
        geometry.height(),
        geometry.spine_width,
        title.size
    );

    Ok(CoverArtifact {
        bytes,
        width_pt: geometry.width(),
        height_pt: geometry.height(),
        spine_width_pt: geometry.spine_width,
    })
}

// =============================================================================
// Content Stream
// =============================================================================

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn rgb_operands((r, g, b): (f32, f32, f32)) -> Vec<Object> {
    vec![real(r), real(g), real(b)]
}

fn push_background(ops: &mut Vec<Operation>, area: &Rect) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("rg", rgb_operands(BACKGROUND_RGB)));
    ops.push(Operation::new(
        "re",
        vec![real(area.x), real(area.y), real(area.width), real(area.height)],
    ));
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

/// One line of text with the given text matrix
fn push_text(
    ops: &mut Vec<Operation>,
    field: &'static str,
    font: &[u8],
    size: f32,
    matrix: [f32; 6],
    line: &str,
) -> Result<()> {
    let encoded = encode_win_ansi(field, line)?;
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.to_vec()), real(size)],
    ));
    ops.push(Operation::new("rg", rgb_operands(TEXT_RGB)));
    ops.push(Operation::new("Tm", matrix.iter().copied().map(real).collect()));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(encoded, StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
    Ok(())
}

/// Centre each line of `block` on the panel, first baseline at `first_baseline`,
/// moving down. Returns the last baseline.
fn push_centered_block(
    ops: &mut Vec<Operation>,
    field: &'static str,
    panel: &Rect,
    block: &TextBlock,
    bold: bool,
    first_baseline: f32,
) -> Result<f32> {
    let font = if bold { FONT_BOLD } else { FONT_REGULAR };
    let mut baseline = first_baseline;
    for (idx, line) in block.lines.iter().enumerate() {
        if idx > 0 {
            baseline -= block.size * LINE_SPACING;
        }
        let x = panel.center_x() - text_width(line, block.size, bold) / 2.0;
        push_text(ops, field, font, block.size, [1.0, 0.0, 0.0, 1.0, x, baseline], line)?;
    }
    Ok(baseline)
}

fn push_front_panel(
    ops: &mut Vec<Operation>,
    front: &Rect,
    title: &TextBlock,
    subtitle: Option<&TextBlock>,
    author: &TextBlock,
) -> Result<()> {
    let title_baseline = front.top() - TITLE_TOP_OFFSET - title.size;
    let mut lowest = push_centered_block(ops, "title", front, title, true, title_baseline)?;
    let mut lowest_field = "title";

    if let Some(subtitle) = subtitle {
        let first = lowest - SUBTITLE_GAP - subtitle.size;
        lowest = push_centered_block(ops, "subtitle", front, subtitle, false, first)?;
        lowest_field = "subtitle";
    }

    // Author block sits on a fixed baseline and grows upward
    let author_first = front.y
        + AUTHOR_BASELINE_OFFSET
        + (author.lines.len().saturating_sub(1)) as f32 * author.size * LINE_SPACING;
    let author_top = author_first + author.size;
    if lowest - AUTHOR_CLEARANCE < author_top {
        return Err(CoverError::TextTooLong {
            field: lowest_field,
        });
    }
    push_centered_block(ops, "author", front, author, false, author_first)?;

    Ok(())
}

/// Title and author running top to bottom along the spine
fn push_spine(ops: &mut Vec<Operation>, geometry: &CoverGeometry, text: &CoverText) -> Result<()> {
    if geometry.spine_width < MIN_SPINE_TEXT_IN * POINTS_PER_INCH {
        return Ok(());
    }

    let spine = geometry.spine();
    let line = format!("{} \u{2014} {}", text.title.trim(), text.author.trim());
    let available = spine.height - 2.0 * SAFE_MARGIN;

    let mut size = (spine.width * SPINE_FONT_RATIO).min(SPINE_FONT_MAX);
    while size >= SPINE_FONT_MIN {
        let width = text_width(&line, size, true);
        if width <= available {
            // Rotated 90° clockwise: text advances down the page
            let x = spine.center_x() - size * 0.35;
            let y = spine.center_y() + width / 2.0;
            return push_text(ops, "spine", FONT_BOLD, size, [0.0, -1.0, 1.0, 0.0, x, y], &line);
        }
        size -= 1.0;
    }

    log::warn!("Spine text does not fit at {} pt, leaving the spine blank", SPINE_FONT_MIN);
    Ok(())
}

// =============================================================================
// Document Assembly
// =============================================================================

fn rect_array(rect: &Rect) -> Object {
    Object::Array(vec![
        real(rect.x),
        real(rect.y),
        real(rect.right()),
        real(rect.top()),
    ])
}

fn base_font(name: &[u8]) -> Dictionary {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(name.to_vec()));
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    font_dict
}

fn build_document(geometry: &CoverGeometry, content: Vec<u8>, text: &CoverText) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(base_font(b"Helvetica"));
    let bold_id = doc.add_object(base_font(b"Helvetica-Bold"));

    let mut fonts = Dictionary::new();
    fonts.set(FONT_REGULAR, Object::Reference(regular_id));
    fonts.set(FONT_BOLD, Object::Reference(bold_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

    let media_box = geometry.media_box();
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        ("MediaBox", rect_array(&media_box)),
        ("BleedBox", rect_array(&media_box)),
        ("TrimBox", rect_array(&geometry.trim_box())),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(Dictionary::from_iter(vec![
        (
            "Title",
            Object::String(encode_win_ansi("title", &text.title)?, StringFormat::Literal),
        ),
        (
            "Author",
            Object::String(encode_win_ansi("author", &text.author)?, StringFormat::Literal),
        ),
    ]));
    doc.trailer.set("Info", info_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}
