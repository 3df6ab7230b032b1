use criterion::{criterion_group, criterion_main, Criterion};

use cooklite::{ParseMode, RecipeParser};

const TEST_RECIPE: &str = include_str!("./test_recipe.cook");

fn complete_recipe(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_recipe");

    let strict = RecipeParser::new(ParseMode::Strict);
    let permissive = RecipeParser::new(ParseMode::Permissive);

    group.bench_with_input("strict", TEST_RECIPE, |b, input| {
        b.iter(|| strict.parse(input))
    });
    group.bench_with_input("permissive", TEST_RECIPE, |b, input| {
        b.iter(|| permissive.parse(input))
    });
}

fn projections(c: &mut Criterion) {
    let mut group = c.benchmark_group("projections");

    let recipe = cooklite::parse(TEST_RECIPE)
        .into_output()
        .expect("bench recipe parses");

    group.bench_function("flatten_steps", |b| b.iter(|| recipe.flatten_steps()));
    group.bench_function("group_ingredients", |b| b.iter(|| recipe.group_ingredients()));
}

criterion_group!(benches, complete_recipe, projections);
criterion_main!(benches);
