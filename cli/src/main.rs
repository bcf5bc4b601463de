use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use cookbook_core::persist::{
    load_catalog, load_config, read_saved_selections, save_favorites, save_shopping_list, PrefsPaths,
};
use cookbook_core::{Category, EngineState, Listing, OpOutcome, Recipe, RecipeEngine, RecipeId, SelectionOp};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cookbook")]
#[command(about = "Search a recipe catalog and build shopping lists", long_about = None)]
struct Cli {
    /// Catalog path (.json, .jsonl, or a directory of them)
    #[arg(long, global = true, default_value = "./catalog")]
    catalog: PathBuf,
    /// JSON engine config with the quantity limit and lookup tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the serialized favorites and shopping list
    #[arg(long, global = true, default_value = "./prefs")]
    prefs: PathBuf,
    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recipes matching every term; each --any adds an alternative query
    Search {
        terms: Vec<String>,
        #[arg(long = "any")]
        any: Vec<String>,
    },
    /// Recipes in a category: all, chicken, pork, beef, seafood, vegetarian
    Browse { category: String },
    /// Every recipe, sorted by name
    List,
    /// One recipe with ingredients and directions
    Show {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// Change a favorite
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Favorite recipes, sorted by name
    Favorites,
    /// Shopping list commands
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
}

#[derive(Subcommand)]
enum FavoriteAction {
    Add { id: RecipeId },
    Remove { id: RecipeId },
    Toggle { id: RecipeId },
}

#[derive(Subcommand)]
enum ShopAction {
    /// Set how many times a recipe is on the list; 0 removes it
    Set {
        id: RecipeId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Recipes on the list and the combined ingredients
    List,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let paths = PrefsPaths::new(&cli.prefs);
    let engine = open(&cli, &paths)?;

    match cli.command {
        Commands::Search { terms, any } => {
            let mut queries = any;
            if !terms.is_empty() {
                queries.push(terms.join(" "));
            }
            if queries.is_empty() {
                tracing::info!("empty search, nothing to do");
                return Ok(());
            }
            print_recipes(&engine.search_any(queries.as_slice()), cli.json)
        }
        Commands::Browse { category } => {
            let category: Category = category.parse()?;
            print_recipes(&engine.list(&Listing::Category(category)), cli.json)
        }
        Commands::List => print_recipes(&engine.list(&Listing::All), cli.json),
        Commands::Show { id } => {
            let recipe = engine.lock().find_by_raw_id(id).ok_or_else(|| anyhow!("no recipe with id {id}"))?;
            print_recipe(&recipe, cli.json)
        }
        Commands::Favorite { action } => {
            let op = match action {
                FavoriteAction::Add { id } => SelectionOp::AddFavorite(id),
                FavoriteAction::Remove { id } => SelectionOp::RemoveFavorite(id),
                FavoriteAction::Toggle { id } => SelectionOp::ToggleFavorite(id),
            };
            let outcome = engine.transact(|state| apply_and_save(state, op, &paths))?;
            print_outcome(&outcome, cli.json)
        }
        Commands::Favorites => print_recipes(&engine.list(&Listing::Favorites), cli.json),
        Commands::Shop { action: ShopAction::Set { id, quantity } } => {
            let outcome = engine.transact(|state| apply_and_save(state, SelectionOp::SetQuantity { id, quantity }, &paths))?;
            print_outcome(&outcome, cli.json)
        }
        Commands::Shop { action: ShopAction::List } => print_shopping_list(&engine, cli.json),
    }
}

fn open(cli: &Cli, paths: &PrefsPaths) -> Result<RecipeEngine> {
    let config = load_config(cli.config.as_deref())?;
    let engine = RecipeEngine::new(&config);
    let recipes = load_catalog(&cli.catalog)?;
    engine.rebuild(recipes, || read_saved_selections(paths))?;
    Ok(engine)
}

// Applies the op and persists the affected store while the lock is held.
fn apply_and_save(state: &mut EngineState, op: SelectionOp, paths: &PrefsPaths) -> Result<OpOutcome> {
    let outcome = state.apply(op)?;
    match &outcome {
        OpOutcome::Favorite { serialized, .. } => save_favorites(paths, serialized)?,
        OpOutcome::Quantity { serialized, .. } => save_shopping_list(paths, serialized)?,
    }
    Ok(outcome)
}

fn print_recipes(recipes: &[Arc<Recipe>], json: bool) -> Result<()> {
    if json {
        let plain: Vec<&Recipe> = recipes.iter().map(Arc::as_ref).collect();
        println!("{}", serde_json::to_string_pretty(&plain)?);
        return Ok(());
    }
    for r in recipes {
        println!("{:>5}  {}  ({})", r.id, r.name, r.time.display().trim());
    }
    eprintln!("showing {} recipes", recipes.len());
    Ok(())
}

fn print_recipe(recipe: &Recipe, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
        return Ok(());
    }
    println!("{}", recipe.name);
    if !recipe.author.is_empty() {
        println!("by {}", recipe.author);
    }
    println!("Prep time: {}", recipe.time.display());
    if let Some(servings) = recipe.servings {
        println!("Servings: {servings}");
    }
    println!("\nIngredients");
    for ingredient in &recipe.ingredients {
        println!("  {}", ingredient.display());
    }
    println!("\nDirections");
    for (n, step) in recipe.directions.iter().enumerate() {
        println!("  {}. {step}", n + 1);
    }
    Ok(())
}

fn print_outcome(outcome: &OpOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    match outcome {
        OpOutcome::Favorite { id, is_favorite: true, .. } => println!("added {id} to favorites"),
        OpOutcome::Favorite { id, is_favorite: false, .. } => println!("{id} is no longer a favorite"),
        OpOutcome::Quantity { id, previous, current, .. } if current > previous => {
            println!("added {} of {id} to the shopping list", current - previous)
        }
        OpOutcome::Quantity { id, previous, current, .. } if current < previous => {
            println!("removed {} of {id} from the shopping list", previous - current)
        }
        OpOutcome::Quantity { id, current, .. } => println!("{id} stays at {current}"),
    }
    Ok(())
}

fn print_shopping_list(engine: &RecipeEngine, json: bool) -> Result<()> {
    let state = engine.lock();
    let recipes = state.shopping_list_recipes();
    let summary = state.shopping_summary();
    if json {
        let items: Vec<serde_json::Value> = recipes
            .iter()
            .map(|r| serde_json::json!({ "id": r.id, "name": r.name, "quantity": state.get_quantity(r.id) }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "recipes": items, "summary": summary }))?);
        return Ok(());
    }
    if recipes.is_empty() {
        println!("the shopping list is empty");
        return Ok(());
    }
    for r in &recipes {
        println!("{:>3} x {}", state.get_quantity(r.id), r.name);
    }
    for (food_type, items) in summary.sections() {
        println!("\n{food_type} ({})", items.len());
        for item in items {
            println!("  {item}");
        }
    }
    Ok(())
}
