use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use cookbook_core::persist::{
    load_catalog, load_config, read_saved_selections, save_favorites, save_shopping_list, PrefsPaths,
};
use cookbook_core::{
    Category, EngineError, EngineState, Listing, OpOutcome, Recipe, RecipeEngine, RecipeId, SelectionOp,
    ShoppingSummary,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

type ApiError = (StatusCode, String);

/// Where the server reads its catalog, engine config and preference files.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub catalog: PathBuf,
    pub config: Option<PathBuf>,
    pub prefs: PathBuf,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecipeEngine>,
    pub prefs: PrefsPaths,
    pub catalog: PathBuf,
    pub admin_token: Option<String>,
}

#[derive(Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub author: String,
    pub time: String,
    pub is_vegetarian: bool,
    pub is_favorite: bool,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub queries: Vec<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<RecipeSummary>,
}

#[derive(Serialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub ingredients: Vec<String>,
    pub time: String,
    pub is_vegetarian: bool,
    pub is_favorite: bool,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ShoppingListResponse {
    pub recipes: Vec<RecipeSummary>,
    pub summary: ShoppingSummary,
}

#[derive(Deserialize)]
pub struct QuantityBody {
    pub quantity: i64,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub recipes: usize,
    pub favorites: usize,
    pub shopping_list: usize,
}

/// Loads the catalog and saved selections, then builds the router.
pub fn build_app(config: ServerConfig) -> Result<Router> {
    let engine_config = load_config(config.config.as_deref())?;
    let engine = RecipeEngine::new(&engine_config);
    let prefs = PrefsPaths::new(&config.prefs);
    let count = engine.rebuild(load_catalog(&config.catalog)?, || read_saved_selections(&prefs))?;
    info!(count, catalog = %config.catalog.display(), "catalog loaded");

    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState { engine: Arc::new(engine), prefs, catalog: config.catalog, admin_token };
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recipes", get(recipes_handler))
        .route("/recipes/:id", get(recipe_handler))
        .route("/search", get(search_handler))
        .route("/categories/:category", get(category_handler))
        .route("/favorites", get(favorites_handler))
        .route("/favorites/:id/toggle", post(toggle_favorite))
        .route("/shopping-list", get(shopping_list_handler))
        .route("/shopping-list/:id", put(set_quantity))
        .route("/admin/reset", post(admin_reset))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn summarize(state: &EngineState, recipe: &Recipe) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id,
        name: recipe.name.clone(),
        author: recipe.author.clone(),
        time: recipe.time.display(),
        is_vegetarian: state.is_vegetarian(recipe.id),
        is_favorite: state.is_favorite(recipe.id),
        quantity: state.get_quantity(recipe.id),
    }
}

fn summarize_all(state: &EngineState, recipes: &[Arc<Recipe>]) -> Vec<RecipeSummary> {
    recipes.iter().map(|r| summarize(state, r)).collect()
}

fn list_response(state: &EngineState, listing: &Listing) -> ListResponse {
    let recipes = summarize_all(state, &state.list(listing));
    ListResponse { total: recipes.len(), recipes }
}

fn engine_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::UnknownRecipe(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

pub async fn recipes_handler(State(state): State<AppState>) -> Json<ListResponse> {
    let engine = state.engine.lock();
    Json(list_response(&engine, &Listing::All))
}

pub async fn recipe_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let engine = state.engine.lock();
    let recipe = engine.find_by_raw_id(id).ok_or((StatusCode::NOT_FOUND, format!("recipe {id} does not exist")))?;
    Ok(Json(RecipeDetail {
        ingredients: recipe.ingredients.iter().map(|i| i.display()).collect(),
        time: recipe.time.display(),
        is_vegetarian: engine.is_vegetarian(recipe.id),
        is_favorite: engine.is_favorite(recipe.id),
        quantity: engine.get_quantity(recipe.id),
        recipe: recipe.as_ref().clone(),
    }))
}

/// `?q=a+b` matches recipes containing both words; repeating `q` unions the results.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let queries: Vec<String> = params.into_iter().filter(|(k, _)| k == "q").map(|(_, v)| v).collect();
    if queries.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "missing query parameter q".into()));
    }
    let engine = state.engine.lock();
    let results = summarize_all(&engine, &engine.search_any(queries.as_slice()));
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { queries, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ListResponse>, ApiError> {
    let category: Category = category.parse().map_err(engine_error)?;
    let engine = state.engine.lock();
    Ok(Json(list_response(&engine, &Listing::Category(category))))
}

pub async fn favorites_handler(State(state): State<AppState>) -> Json<ListResponse> {
    let engine = state.engine.lock();
    Json(list_response(&engine, &Listing::Favorites))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<OpOutcome>, ApiError> {
    apply_and_save(&state, SelectionOp::ToggleFavorite(id)).map(Json)
}

pub async fn shopping_list_handler(State(state): State<AppState>) -> Json<ShoppingListResponse> {
    let engine = state.engine.lock();
    Json(ShoppingListResponse {
        recipes: summarize_all(&engine, &engine.shopping_list_recipes()),
        summary: engine.shopping_summary(),
    })
}

pub async fn set_quantity(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    Json(body): Json<QuantityBody>,
) -> Result<Json<OpOutcome>, ApiError> {
    apply_and_save(&state, SelectionOp::SetQuantity { id, quantity: body.quantity }).map(Json)
}

// Mutation and file write happen under one lock so concurrent requests
// cannot persist an older snapshot over a newer one.
fn apply_and_save(state: &AppState, op: SelectionOp) -> Result<OpOutcome, ApiError> {
    state.engine.transact(|engine| {
        let outcome = engine.apply(op).map_err(engine_error)?;
        let saved = match &outcome {
            OpOutcome::Favorite { serialized, .. } => save_favorites(&state.prefs, serialized),
            OpOutcome::Quantity { serialized, .. } => save_shopping_list(&state.prefs, serialized),
        };
        saved.map_err(internal)?;
        Ok(outcome)
    })
}

/// Reloads the catalog and both preference files, replacing the engine state in one step.
async fn admin_reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ResetResponse>, ApiError> {
    authorize(&state, &headers)?;
    let recipes = load_catalog(&state.catalog).map_err(internal)?;
    let count = state
        .engine
        .rebuild(recipes, || read_saved_selections(&state.prefs))
        .map_err(|e| internal(e.into()))?;

    let engine = state.engine.lock();
    info!(count, "engine reset from disk");
    Ok(Json(ResetResponse {
        recipes: count,
        favorites: engine.favorites().len(),
        shopping_list: engine.shopping_list().len(),
    }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
