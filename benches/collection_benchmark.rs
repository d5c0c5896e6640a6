//! UI hot paths: message insertion, body wrapping, and a full frame.
//!
//! Target: a frame (render + diff) well under 1ms at 200x50.

use chrono::Local;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use tmail::buffer::diff::{render_diff, DiffState};
use tmail::ui::{self, wrap::wrap, AppEvent, MessageCollection, Theme, ViewState};
use tmail::Message;

fn message(i: i64) -> Message {
    Message {
        id: format!("m{i}"),
        // Scrambled arrival order.
        cursor: (i * 7919) % 10_007,
        from: format!("Sender {i} <sender{i}@example.com>"),
        subject: format!("Quarterly report number {i}"),
        body: "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(40),
        ..Message::default()
    }
}

fn collection_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_insert");
    for count in [100_i64, 1_000] {
        let messages: Vec<Message> = (0..count).map(message).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &messages, |b, messages| {
            b.iter(|| {
                let mut collection = MessageCollection::new();
                for m in messages {
                    collection.insert(black_box(m.clone()));
                }
                collection.len()
            });
        });
    }
    group.finish();
}

fn body_wrap(c: &mut Criterion) {
    let body = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n".repeat(200);
    let mut group = c.benchmark_group("wrap");
    for width in [40_usize, 120] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| wrap(black_box(&body), width).len());
        });
    }
    group.finish();
}

fn frame(c: &mut Criterion) {
    let mut state = ViewState::new(Duration::from_secs(30), Local::now());
    ui::update(&mut state, AppEvent::Resize { width: 200, height: 50 });
    for i in 0..200 {
        ui::update(&mut state, AppEvent::NewMessage(message(i)));
    }
    let theme = Theme::DEFAULT;
    let Some(previous) = ui::render(&state, &theme) else {
        return;
    };

    c.bench_function("render_200x50", |b| {
        b.iter(|| ui::render(black_box(&state), &theme));
    });

    let mut scrolled = state.clone();
    scrolled.preview_scroll = 3;
    let Some(next) = ui::render(&scrolled, &theme) else {
        return;
    };
    c.bench_function("diff_200x50_preview_scroll", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(16 * 1024);
            let mut diff_state = DiffState::new();
            render_diff(black_box(&previous), black_box(&next), &mut output, &mut diff_state)
        });
    });
}

criterion_group!(benches, collection_insert, body_wrap, frame);
criterion_main!(benches);
