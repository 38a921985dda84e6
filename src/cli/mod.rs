//! Command-line driver for the planning engine.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use db::SqliteStore;
use meal_planning::{SolvedPlan, SolverConfig};
use recipe::{MealSlot, NewRecipe, RecipeCategory, RecipeFilter, RecipeStore};
use shopping::format_for_clipboard;

use crate::config::Settings;
use crate::error::AppError;
use crate::file_remote::FileRemote;

/// mealprep - macro-targeted meal planning
#[derive(Parser)]
#[command(name = "mealprep")]
#[command(about = "Weekly meal plans that hit your macro targets", long_about = None)]
pub struct Cli {
    /// Path to a configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database schema and default rows
    Migrate,
    /// Import recipes from a JSON file
    Import {
        /// Path to a JSON array of recipes
        #[arg(long)]
        file: PathBuf,
    },
    /// List the recipe library
    ListRecipes {
        #[arg(long)]
        category: Option<String>,

        /// Substring match on the recipe name
        #[arg(long)]
        search: Option<String>,
    },
    /// Generate weekly plan candidates
    Generate {
        /// Persist the plan at this 1-based index as the selected plan
        #[arg(long)]
        select: Option<usize>,
    },
    /// Replace one meal of a stored plan
    Reroll {
        #[arg(long)]
        plan_id: String,

        /// 1-based day number within the plan
        #[arg(long)]
        day: usize,

        /// Meal slot name (breakfast, lunch, dinner, snack, dessert)
        #[arg(long)]
        slot: String,

        /// Seed for reproducible candidate choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build the shopping list for a stored plan
    ShoppingList {
        #[arg(long)]
        plan_id: String,
    },
    /// Two-way sync with the configured remote
    Sync,
}

pub async fn run(command: Commands, store: &SqliteStore, settings: &Settings) -> Result<(), AppError> {
    match command {
        // Migration already ran during startup.
        Commands::Migrate => {
            println!("database ready");
            Ok(())
        }
        Commands::Import { file } => import_recipes(store, &file).await,
        Commands::ListRecipes { category, search } => list_recipes(store, category, search).await,
        Commands::Generate { select } => generate(store, select).await,
        Commands::Reroll {
            plan_id,
            day,
            slot,
            seed,
        } => reroll(store, &plan_id, day, &slot, seed).await,
        Commands::ShoppingList { plan_id } => shopping_list(store, &plan_id).await,
        Commands::Sync => run_sync(store, settings).await,
    }
}

async fn import_recipes(store: &SqliteStore, file: &PathBuf) -> Result<(), AppError> {
    let text = std::fs::read_to_string(file)
        .map_err(|err| AppError::BadRequest(format!("cannot read {}: {err}", file.display())))?;
    let recipes: Vec<NewRecipe> = serde_json::from_str(&text)
        .map_err(|err| AppError::BadRequest(format!("invalid recipe JSON: {err}")))?;

    let mut imported = 0usize;
    for recipe in recipes {
        RecipeStore::insert(store, recipe).await?;
        imported += 1;
    }
    println!("imported {imported} recipes");
    Ok(())
}

async fn list_recipes(
    store: &SqliteStore,
    category: Option<String>,
    search: Option<String>,
) -> Result<(), AppError> {
    let filter = RecipeFilter {
        category: category.as_deref().map(RecipeCategory::parse).transpose()?,
        source: None,
        search,
    };
    let recipes = RecipeStore::list(store, &filter).await?;
    for recipe in &recipes {
        println!(
            "{}  [{}]  {:.0} kcal / {:.0}g protein  {}",
            recipe.id,
            recipe.category.as_str(),
            recipe.macros.calories,
            recipe.macros.protein,
            recipe.name,
        );
    }
    println!("{} recipes", recipes.len());
    Ok(())
}

async fn print_plan(store: &SqliteStore, plan_label: &str, days: &[meal_planning::DayPlan]) {
    let ids: Vec<String> = days
        .iter()
        .flat_map(|d| d.meals.iter().map(|m| m.recipe_id.clone()))
        .collect();
    let names: HashMap<String, String> = RecipeStore::get_by_ids(store, &ids)
        .await
        .map(|recipes| recipes.into_iter().map(|r| (r.id, r.name)).collect())
        .unwrap_or_default();

    println!("{plan_label}");
    for day in days {
        println!(
            "  {}  ({:.0} kcal, {:.0}g protein)",
            day.label, day.total_calories, day.total_protein
        );
        for meal in &day.meals {
            let name = names
                .get(&meal.recipe_id)
                .map(String::as_str)
                .unwrap_or(meal.recipe_id.as_str());
            println!("    {:10} {}", meal.slot.as_str(), name);
        }
    }
}

async fn generate(store: &SqliteStore, select: Option<usize>) -> Result<(), AppError> {
    let config = SolverConfig::default();
    let plans: Vec<SolvedPlan> =
        meal_planning::generate_meal_plans(store, store, &config).await?;
    if plans.is_empty() {
        println!("no feasible plans; add recipes or relax the targets");
        return Ok(());
    }

    for plan in &plans {
        print_plan(store, &plan.label, &plan.days).await;
        println!(
            "  daily average: {:.0} kcal, {:.0}g protein, {:.0}g fat, {:.0}g carbs",
            plan.summary.avg_calories,
            plan.summary.avg_protein,
            plan.summary.avg_fat,
            plan.summary.avg_carbs
        );
    }

    if let Some(index) = select {
        let chosen = plans
            .into_iter()
            .nth(index.saturating_sub(1))
            .ok_or_else(|| AppError::BadRequest(format!("no plan at index {index}")))?;
        let saved = meal_planning::select_plan(store, chosen).await?;
        println!("selected {} as {}", saved.label, saved.id);
    }
    Ok(())
}

async fn reroll(
    store: &SqliteStore,
    plan_id: &str,
    day: usize,
    slot: &str,
    seed: Option<u64>,
) -> Result<(), AppError> {
    let slot = MealSlot::parse(slot)?;
    let day_index = day
        .checked_sub(1)
        .ok_or_else(|| AppError::BadRequest("day numbers start at 1".to_string()))?;

    match meal_planning::reroll_meal(store, store, plan_id, day_index, slot, seed).await? {
        Some(outcome) => {
            println!("replaced {} with {}", slot.as_str(), outcome.replacement.name);
            print_plan(store, &outcome.plan.label, &outcome.plan.days).await;
        }
        None => println!("no unused {} recipes to swap in", slot.as_str()),
    }
    Ok(())
}

async fn shopping_list(store: &SqliteStore, plan_id: &str) -> Result<(), AppError> {
    let list = shopping::generate_shopping_list(store, store, store, plan_id).await?;
    print!("{}", format_for_clipboard(&list.items));
    println!("{} items (list {})", list.items.len(), list.id);
    Ok(())
}

async fn run_sync(store: &SqliteStore, settings: &Settings) -> Result<(), AppError> {
    let Some(path) = &settings.remote.recipes_file else {
        return Err(AppError::BadRequest(
            "no remote configured; set remote.recipes_file".to_string(),
        ));
    };
    let remote = FileRemote::new(path);

    let outcome = sync::sync_recipes(store, store, store, &remote).await?;
    println!(
        "pulled {}, pushed {}, {} conflicts",
        outcome.pulled,
        outcome.pushed,
        outcome.conflicts.len()
    );
    for conflict in &outcome.conflicts {
        println!(
            "  conflict on {}: local {:?} vs server {:?}",
            conflict.local.id, conflict.local.name, conflict.server.name
        );
    }
    if let Some(error) = outcome.error {
        println!("sync incomplete: {error}");
    }
    Ok(())
}
