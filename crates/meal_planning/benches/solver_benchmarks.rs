use std::collections::HashSet;
use std::hint::black_box;

use chrono::Utc;
use criterion::{Criterion, criterion_group, criterion_main};
use meal_planning::{
    MicrolpSolver, MilpSolver, PlanContext, SolverConfig, Tier, build_plan_problem, generate_plans,
};
use recipe::{Macros, NewRecipe, Recipe, RecipeCategory, RecipeSource};
use user::Preferences;

fn library(per_category: usize) -> Vec<Recipe> {
    let categories = [
        RecipeCategory::Breakfast,
        RecipeCategory::Lunch,
        RecipeCategory::Dinner,
    ];
    let mut recipes = Vec::new();
    for (ci, category) in categories.iter().enumerate() {
        for i in 0..per_category {
            let mut input = NewRecipe::new(
                format!("{} {}", category.as_str(), i),
                *category,
                RecipeSource::Manual,
            );
            input.id = Some(format!("{}-{}", category.as_str(), i));
            input.macros = Macros {
                calories: 500.0 + 175.0 * ci as f64 + 10.0 * (i % 5) as f64,
                protein: 25.0 + 10.0 * ci as f64 + (i % 3) as f64,
                fat: 20.0 + 5.0 * ci as f64,
                carbs: 50.0 + 30.0 * ci as f64,
                fiber: 5.0,
            };
            recipes.push(input.into_recipe(Utc::now()).unwrap());
        }
    }
    recipes
}

fn bench_build(c: &mut Criterion) {
    let recipes = library(10);
    let prefs = Preferences::default();
    let config = SolverConfig::default();
    let ctx = PlanContext::from_preferences(&recipes, &prefs, &config).unwrap();

    c.bench_function("build_week_model_30_recipes", |b| {
        b.iter(|| black_box(build_plan_problem(&ctx, Tier::Full, &HashSet::new())))
    });
}

fn bench_solve(c: &mut Criterion) {
    let recipes = library(10);
    let prefs = Preferences::default();
    let config = SolverConfig::default();
    let ctx = PlanContext::from_preferences(&recipes, &prefs, &config).unwrap();
    let problem = build_plan_problem(&ctx, Tier::Full, &HashSet::new());

    c.bench_function("solve_week_model_30_recipes", |b| {
        b.iter(|| black_box(MicrolpSolver.solve(&problem.spec, config.solve_timeout)))
    });
}

fn bench_generate(c: &mut Criterion) {
    let recipes = library(10);
    let prefs = Preferences::default();
    let config = SolverConfig::default();

    c.bench_function("generate_three_weekly_plans", |b| {
        b.iter(|| black_box(generate_plans(&recipes, &prefs, &config, &MicrolpSolver)))
    });
}

criterion_group!(benches, bench_build, bench_solve, bench_generate);
criterion_main!(benches);
