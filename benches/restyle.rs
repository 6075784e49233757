//! Benchmarks for the restyle pass and the fade tick.

use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nopad::editor::NoteBuffer;
use nopad::engine::{EngineConfig, FadeTracker, Restyler};
use nopad::theme::Theme;

fn large_note() -> String {
    let mut text = String::new();
    for i in 0..2_000 {
        if i % 10 == 0 {
            text.push_str(&format!("{} Section {i}\n", "#".repeat(1 + i % 6)));
        } else {
            text.push_str(&format!("Line {i} of a long running note with some words.\n"));
        }
    }
    text
}

fn bench_restyle_pass(c: &mut Criterion) {
    let text = large_note();
    let restyler = Restyler::new(Theme::nopad());
    let mut buffer = NoteBuffer::from_text(&text);

    c.bench_function("restyle_pass", |b| {
        b.iter(|| restyler.restyle_now(black_box(&mut buffer)));
    });
}

fn bench_fade_advance(c: &mut Criterion) {
    let text = large_note();
    let len = text.chars().count();
    let start = Instant::now();
    let mut fades = FadeTracker::new(&EngineConfig::default());
    fades.register(0, &text[..500], start);
    let now = start + Duration::from_millis(100);

    c.bench_function("fade_advance_500", |b| {
        b.iter(|| fades.advance(black_box(now), black_box(len)));
    });
}

fn bench_visible_lines(c: &mut Criterion) {
    let text = large_note();
    let theme = Theme::nopad();
    let buffer = NoteBuffer::from_text(&text);

    c.bench_function("visible_lines", |b| {
        b.iter(|| nopad::ui::visible_lines(&buffer, &theme, black_box(500), black_box(40)));
    });
}

criterion_group!(
    benches,
    bench_restyle_pass,
    bench_fade_advance,
    bench_visible_lines
);
criterion_main!(benches);
