use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_wordgame::lexicon::{DawgBuilder, Lexicon};

/// Every word of up to four letters over a small alphabet.
fn word_list() -> Vec<String> {
    let alphabet = ['A', 'E', 'I', 'N', 'R', 'S', 'T'];
    let mut words = Vec::new();
    let mut frontier = vec![String::new()];
    for _ in 0..4 {
        let mut longer = Vec::new();
        for prefix in &frontier {
            for c in alphabet {
                let mut word = prefix.clone();
                word.push(c);
                longer.push(word);
            }
        }
        words.extend(longer.iter().filter(|w| w.len() >= 2).cloned());
        frontier = longer;
    }
    words
}

fn lexicon_benchmarks(c: &mut Criterion) {
    let words = word_list();
    let builder = DawgBuilder::from_words(words.iter().map(String::as_str));
    let bytes = builder.build();
    let lexicon = Lexicon::from_bytes("bench", &bytes).expect("valid dictionary");

    c.bench_function("build", |b| b.iter(|| black_box(builder.build())));
    c.bench_function("load", |b| {
        b.iter(|| Lexicon::from_bytes("bench", black_box(&bytes)))
    });
    c.bench_function("has_word", |b| {
        b.iter(|| {
            for word in ["RATS", "STAR", "ZZZ", "TEN"] {
                black_box(lexicon.has_word(black_box(word)));
            }
        })
    });
    c.bench_function("find_anagrams", |b| {
        b.iter(|| black_box(lexicon.find_anagrams(black_box("STARE N"))))
    });
}

criterion_group!(benches, lexicon_benchmarks);
criterion_main!(benches);
