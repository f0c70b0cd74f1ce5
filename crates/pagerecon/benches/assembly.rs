//! Performance benchmarks for pagerecon.
//!
//! Benchmarks replay recorded drawing events into fresh pages:
//! - Text: dense lines of upright text
//! - Redraw: every line drawn twice, exercising span occlusion
//! - Mixed: text, clipped rectangles and repeated inline images

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pagerecon::{
    CharEvent, ClipEvent, Color, ContentHandler, Ctm, Document, ExtractOptions, FillRule,
    FontDescriptor, FontEncoding, FontId, FontKind, FontMap, ImageEvent, ImageMetadata,
    PathCommand, PathEvent, PathKind, Point, StandardEncoding,
};

// ---------------------------------------------------------------------------
// Event fixture generators
// ---------------------------------------------------------------------------

/// One recorded interpreter callback.
enum Event {
    Char(CharEvent),
    EndText,
    Save,
    Restore,
    Clip(ClipEvent),
    Path(PathEvent),
    FillColor(Color),
    Image(ImageEvent),
}

fn replay<H: ContentHandler>(handler: &mut H, events: &[Event]) {
    for event in events {
        match event {
            Event::Char(c) => handler.on_char(c.clone()),
            Event::EndText => handler.end_text_object(),
            Event::Save => handler.save_state(),
            Event::Restore => handler.restore_state(),
            Event::Clip(c) => handler.on_clip(c.clone()),
            Event::Path(p) => handler.on_path_painted(p.clone()),
            Event::FillColor(c) => handler.set_fill_color(*c),
            Event::Image(i) => handler.on_image(i.clone()),
        }
    }
}

fn rect(x0: f64, top: f64, x1: f64, bottom: f64) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo(Point::new(x0, top)),
        PathCommand::LineTo(Point::new(x1, top)),
        PathCommand::LineTo(Point::new(x1, bottom)),
        PathCommand::LineTo(Point::new(x0, bottom)),
        PathCommand::Close,
    ]
}

/// `n_lines` lines of ~70 characters, 14pt apart.
fn text_events(n_lines: usize, events: &mut Vec<Event>) {
    for i in 0..n_lines {
        let line = format!(
            "Line {} of the document with some words to measure assembly speed here",
            i + 1
        );
        let baseline = 72.0 + 14.0 * i as f64;
        for (j, ch) in line.chars().enumerate() {
            events.push(Event::Char(CharEvent {
                code: ch as u32,
                unicode: Some(ch),
                origin: Point::new(72.0 + 5.5 * j as f64, baseline),
                advance: 5.5,
                transform: Ctm::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
                visible: true,
                outline: false,
            }));
        }
        events.push(Event::EndText);
    }
}

fn text_page() -> Vec<Event> {
    let mut events = Vec::new();
    text_events(50, &mut events);
    events
}

fn redraw_page() -> Vec<Event> {
    let mut events = Vec::new();
    text_events(50, &mut events);
    text_events(50, &mut events);
    events
}

/// Text plus a grid of clipped cells, each with a small inline image.
fn mixed_page() -> Vec<Event> {
    let mut events = Vec::new();
    text_events(20, &mut events);
    for row in 0..20 {
        for col in 0..5 {
            let x = 72.0 + 90.0 * col as f64;
            let top = 400.0 + 18.0 * row as f64;
            events.push(Event::Save);
            events.push(Event::Clip(ClipEvent {
                commands: rect(x, top, x + 90.0, top + 18.0),
                fill_rule: FillRule::NonZeroWinding,
            }));
            events.push(Event::FillColor(if (row + col) % 2 == 0 {
                Color::new(0.9, 0.9, 0.9)
            } else {
                Color::white()
            }));
            events.push(Event::Path(PathEvent {
                commands: rect(x - 2.0, top, x + 92.0, top + 18.0),
                kind: PathKind::Stroke,
                fill_rule: FillRule::NonZeroWinding,
            }));
            events.push(Event::Image(ImageEvent {
                resource_id: None,
                transform: Ctm::new(12.0, 0.0, 0.0, 12.0, x + 4.0, top + 3.0),
                samples: vec![(row % 3) as u8; 64],
                metadata: ImageMetadata {
                    width: 8,
                    height: 8,
                    bits_per_component: Some(8),
                    ..ImageMetadata::default()
                },
            }));
            events.push(Event::Restore);
        }
    }
    events
}

fn document() -> (Document, FontId) {
    let mut doc = Document::new(Arc::new(FontMap::empty()), ExtractOptions::default());
    let font = doc.register_font(
        FontDescriptor::new("Helvetica", FontKind::Type1)
            .with_encoding(FontEncoding::standard(StandardEncoding::WinAnsi)),
    );
    (doc, font)
}

fn assemble(doc: &mut Document, font: FontId, events: &[Event]) -> usize {
    let mut page = doc.begin_page(0, 612.0, 792.0, 0.0);
    page.set_font(font, 10.0);
    replay(&mut page, events);
    page.finish().spans.len()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_page_assembly(c: &mut Criterion) {
    let text = text_page();
    let redraw = redraw_page();
    let mixed = mixed_page();

    let mut group = c.benchmark_group("page_assembly");
    group.bench_function("text_50_lines", |b| {
        let (mut doc, font) = document();
        b.iter(|| black_box(assemble(&mut doc, font, &text)));
    });
    group.bench_function("redraw_50_lines", |b| {
        let (mut doc, font) = document();
        b.iter(|| black_box(assemble(&mut doc, font, &redraw)));
    });
    group.bench_function("mixed_clipped_images", |b| {
        let (mut doc, font) = document();
        b.iter(|| black_box(assemble(&mut doc, font, &mixed)));
    });
    group.finish();
}

fn bench_font_map_load(c: &mut Criterion) {
    let json = r#"{
        "fonts": [
            { "pattern": "Wingdings", "family": "Wingdings", "tables": ["dings"] },
            { "pattern": "^Fnt\\d+$", "regex": true, "tables": ["custom"] }
        ],
        "tables": {
            "dings": { "a": 9824, "0041": 9827 },
            "custom": { "g12": 65 }
        }
    }"#;
    c.bench_function("font_map_load", |b| {
        b.iter(|| black_box(FontMap::from_json_str(json).map(|m| m.entries().len())));
    });
}

criterion_group!(benches, bench_page_assembly, bench_font_map_load);
criterion_main!(benches);
