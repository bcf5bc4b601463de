use cookbook_core::{Ingredient, NewRecipe, RecipeEngine, SelectionOp};
use criterion::{criterion_group, criterion_main, Criterion};

const WORDS: &[&str] = &["chicken", "pork", "garlic", "onion", "rice", "curry", "lemon", "salmon", "beef", "pie"];

fn build(n: usize) -> RecipeEngine {
    let engine = RecipeEngine::default();
    for i in 0..n {
        let name = format!("{} {} {i}", WORDS[i % WORDS.len()], WORDS[(i / 3) % WORDS.len()]);
        let ingredients = (0..4)
            .map(|j| Ingredient::new("1-1/2", "lbs", WORDS[(i + j) % WORDS.len()], ""))
            .collect();
        engine.add_recipe(NewRecipe::new(&name, ingredients)).unwrap();
    }
    engine
}

fn bench_search(c: &mut Criterion) {
    let engine = build(5_000);
    c.bench_function("search_two_terms", |b| b.iter(|| engine.search(Some("garlic curry"))));
    c.bench_function("search_any_three", |b| b.iter(|| engine.search_any(&["bacon", "ham", "pork"])));
}

fn bench_aggregate(c: &mut Criterion) {
    let engine = build(500);
    for id in 0..100 {
        engine.apply(SelectionOp::SetQuantity { id, quantity: 2 }).unwrap();
    }
    c.bench_function("shopping_summary_100", |b| b.iter(|| engine.shopping_summary()));
}

fn bench_index(c: &mut Criterion) {
    c.bench_function("index_1000", |b| b.iter(|| build(1_000)));
}

criterion_group!(benches, bench_search, bench_aggregate, bench_index);
criterion_main!(benches);
