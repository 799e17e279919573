use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use notation_doc::Document;

fn large_score(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 48);
    out.push_str("\\version \"2.24\"\n\\score {\n  \\relative c' {\n");
    for i in 0..line_count {
        out.push_str(&format!(
            "    c4 d8. e16 r2 | %{{ bar {i} %}} <c e g>4 ( d ) |\n"
        ));
    }
    out.push_str("  }\n}\n");
    out
}

fn bench_full_lex(c: &mut Criterion) {
    let text = large_score(5_000);
    c.bench_function("full_lex/5k_lines", |b| {
        b.iter(|| {
            let doc = Document::new(black_box(&text), None);
            black_box(doc.lexed_line_count());
        })
    });
}

fn bench_incremental_edit(c: &mut Criterion) {
    let text = large_score(5_000);
    c.bench_function("incremental_edit/single_note", |b| {
        b.iter_batched(
            || {
                let doc = Document::new(&text, None);
                let offset = doc.size() / 2;
                (doc, offset)
            },
            |(mut doc, offset)| {
                let mut edit = doc.edit();
                edit.insert(offset, "c");
                edit.commit().unwrap();
                black_box(doc.lexed_line_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_tokens_read(c: &mut Criterion) {
    let text = large_score(5_000);
    let doc = Document::new(&text, None);
    c.bench_function("tokens_read/middle_line", |b| {
        b.iter(|| {
            let tokens = doc.tokens(black_box(2_500));
            black_box(tokens.len());
        })
    });
}

criterion_group!(benches, bench_full_lex, bench_incremental_edit, bench_tokens_read);
criterion_main!(benches);
