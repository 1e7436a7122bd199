use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use corrector_core::{GrammarMatch, ReportFormatter, format_report};

fn matches(n: usize, sentence_words: usize) -> Vec<GrammarMatch> {
    (0..n)
        .map(|i| {
            let sentence = format!("Речення {} містить помилку & <дужки> {}", i, "слово ".repeat(sentence_words));
            GrammarMatch::new(sentence, 8, 1, "Можлива помилка").with_replacements(["виправлення"])
        })
        .collect()
}

fn bench_format_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_report");

    for (label, n) in [("few", 3), ("limit", 15), ("many", 500)] {
        let input = matches(n, 20);
        group.bench_with_input(BenchmarkId::new(label, n), &input, |b, input| {
            b.iter(|| format_report(black_box("Заголовок"), black_box(input)))
        });
    }

    group.finish();
}

fn bench_oversized_segment(c: &mut Criterion) {
    let formatter = ReportFormatter::default();
    let input = matches(1, 2000);

    c.bench_function("oversized_segment", |b| b.iter(|| formatter.render_segment(black_box(&input[0]))));
}

criterion_group!(benches, bench_format_report, bench_oversized_segment);
criterion_main!(benches);
