use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shipsafe::cancel::CancellationToken;
use shipsafe::diff;
use shipsafe::scorer::Scorer;

fn synthetic_diff(file_count: usize, hunks_per_file: usize) -> String {
    let mut out = String::new();
    for i in 0..file_count {
        let path = format!("src/feature_{:03}/file_{:05}.rs", i % 120, i);
        out.push_str(&format!("diff --git a/{path} b/{path}\n"));
        out.push_str("index 0000000..1111111 100644\n");
        out.push_str(&format!("--- a/{path}\n"));
        out.push_str(&format!("+++ b/{path}\n"));
        for h in 0..hunks_per_file {
            let start = h * 20 + 1;
            out.push_str(&format!("@@ -{start},5 +{start},6 @@\n"));
            out.push_str(" fn existing() {}\n");
            out.push_str(&format!("+fn added_{h}() {{\n"));
            out.push_str("+    let api_key = \"sk-test-0123456789abcdef0123456789\";\n");
            out.push_str("+    if true { if true { if true { do_thing(); } } }\n");
            out.push_str("+}\n");
            out.push_str(" fn trailing() {}\n");
        }
    }
    out
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_diff(200, 3);
    c.bench_function("parse_diff_200_files", |b| {
        b.iter(|| {
            let cancel = CancellationToken::new();
            let parsed = diff::parse(black_box(&text), "base".to_string(), "head".to_string(), &cancel).unwrap();
            black_box(parsed);
        })
    });
}

fn bench_score(c: &mut Criterion) {
    let text = synthetic_diff(50, 3);
    let cancel = CancellationToken::new();
    let parsed = diff::parse(&text, "base".to_string(), "head".to_string(), &cancel).unwrap();

    let registry = shipsafe::analyzer::Registry::new();
    registry.register(std::sync::Arc::new(shipsafe::analyzers::SecretsAnalyzer)).unwrap();
    registry.register(std::sync::Arc::new(shipsafe::analyzers::ComplexityAnalyzer::default())).unwrap();

    c.bench_function("analyze_and_score_50_files", |b| {
        b.iter(|| {
            let engine = shipsafe::analyzer::Engine::new(&registry);
            let outcome = engine.run(black_box(&parsed), &cancel);
            let score = Scorer::default().score(&outcome.results);
            black_box(score);
        })
    });
}

criterion_group!(benches, bench_parse, bench_score);
criterion_main!(benches);
