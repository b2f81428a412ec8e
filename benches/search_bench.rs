use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use docrank::{process_queries, DocumentStatus, SearchIndex};

const WORDS: &[&str] = &[
    "cat", "dog", "rat", "sparrow", "collar", "tail", "fluffy", "curly", "nasty", "funny",
    "white", "black", "gray", "fancy", "expressive", "eyes", "hair", "pet", "bird", "fish",
];

fn build_index(documents: i32) -> SearchIndex {
    let mut index = SearchIndex::from_stop_words_text("and with in the").unwrap();
    for id in 0..documents {
        let text: Vec<&str> = (0..12)
            .map(|i| WORDS[((id as usize) * 7 + i * 3) % WORDS.len()])
            .collect();
        index
            .add_document(id, &text.join(" "), DocumentStatus::Actual, &[id % 10])
            .unwrap();
    }
    index
}

fn bench_find_top_documents(c: &mut Criterion) {
    let index = build_index(2_000);
    c.bench_function("find_top_documents", |b| {
        b.iter(|| index.find_top_documents("fluffy cat curly tail -sparrow").unwrap())
    });
    c.bench_function("find_top_documents_par", |b| {
        b.iter(|| index.find_top_documents_par("fluffy cat curly tail -sparrow").unwrap())
    });
}

fn bench_process_queries(c: &mut Criterion) {
    let index = build_index(2_000);
    let queries: Vec<String> = (0..100)
        .map(|i| format!("{} {} -{}", WORDS[i % WORDS.len()], WORDS[(i + 5) % WORDS.len()], WORDS[(i + 11) % WORDS.len()]))
        .collect();
    c.bench_function("process_queries_100", |b| {
        b.iter_batched(
            || queries.clone(),
            |queries| process_queries(&index, &queries),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_find_top_documents, bench_process_queries);
criterion_main!(benches);
