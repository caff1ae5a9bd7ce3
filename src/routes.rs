use std::{collections::BTreeMap, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    error::HandlerError,
    handlers, invitation,
    models::{
        CocktailIngredientView, CocktailInput, CocktailView, ImportMovieRequest, IngredientInput,
        IngredientView, MovieFullView, MovieList, MovieShape, MovieStatusRequest, NoteView,
        PostcardInput, PostcardView, RateMovieRequest, RemoveNoteRequest, UserView,
    },
    stats::{
        ChartSet, DEFAULT_GENRE_COLUMNS, DEFAULT_RANKING_SIZE, GenreComparison, RatingAxis,
        StatsDataset, StatsError, Summary, TopBottom,
    },
};

type JsonResult<T> = Result<Json<T>, HandlerError>;

// --- movies ---

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub shape: MovieShape,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MovieListQuery>,
) -> JsonResult<MovieList> {
    Ok(Json(handlers::movie::get_all(&state.db, q.shape, q.archive).await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(kp_id): Path<i32>,
) -> JsonResult<MovieFullView> {
    Ok(Json(handlers::movie::get(&state.db, kp_id).await?))
}

pub async fn import_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportMovieRequest>,
) -> JsonResult<MovieFullView> {
    Ok(Json(handlers::movie::import(&state.db, &state.kp, req.kp_id).await?))
}

pub async fn movie_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MovieStatusRequest>,
) -> JsonResult<serde_json::Value> {
    handlers::movie::set_archive_status(&state.db, req.kp_id, req.is_archive).await?;
    Ok(Json(json!({ "success": true, "id": req.kp_id })))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(kp_id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    handlers::movie::remove(&state.db, kp_id).await?;
    Ok(Json(json!({ "success": true, "id": kp_id })))
}

// --- notes ---

#[derive(Debug, Deserialize)]
pub struct NoteListQuery {
    #[serde(default)]
    pub grouped: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NoteList {
    Flat(Vec<NoteView>),
    Grouped(BTreeMap<i32, Vec<NoteView>>),
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<NoteListQuery>,
) -> JsonResult<NoteList> {
    let list = if q.grouped {
        NoteList::Grouped(handlers::note::get_all_grouped(&state.db).await?)
    } else {
        NoteList::Flat(handlers::note::get_all_flat(&state.db).await?)
    };
    Ok(Json(list))
}

pub async fn rate_movie(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RateMovieRequest>,
) -> JsonResult<NoteView> {
    Ok(Json(handlers::note::upsert(&state.db, &req).await?))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveNoteRequest>,
) -> JsonResult<serde_json::Value> {
    let note_id = handlers::note::remove(&state.db, req.user, req.movie).await?;
    Ok(Json(json!({ "success": true, "id": note_id })))
}

// --- users ---

pub async fn list_users(State(state): State<Arc<AppState>>) -> JsonResult<Vec<UserView>> {
    Ok(Json(handlers::user::get_all(&state.db).await?))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<UserView> {
    Ok(Json(handlers::user::get(&state.db, id).await?))
}

// --- postcards & invitations ---

pub async fn list_postcards(State(state): State<Arc<AppState>>) -> JsonResult<Vec<PostcardView>> {
    Ok(Json(handlers::postcard::get_all(&state.db).await?))
}

pub async fn create_postcard(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PostcardInput>,
) -> JsonResult<PostcardView> {
    Ok(Json(handlers::postcard::create(&state.db, &input).await?))
}

pub async fn get_postcard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<PostcardView> {
    Ok(Json(handlers::postcard::get(&state.db, id).await?))
}

pub async fn update_postcard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<PostcardInput>,
) -> JsonResult<PostcardView> {
    Ok(Json(handlers::postcard::update(&state.db, id, &input).await?))
}

pub async fn delete_postcard(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    handlers::postcard::delete(&state.db, id).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn active_postcard(State(state): State<Arc<AppState>>) -> JsonResult<PostcardView> {
    Ok(Json(handlers::postcard::get_active(&state.db).await?))
}

pub async fn send_invitation(
    State(state): State<Arc<AppState>>,
) -> JsonResult<invitation::InvitationReport> {
    Ok(Json(invitation::send_invitation(&state.db, &state.http, &state.config).await?))
}

// --- statistics ---

#[derive(Debug, Serialize)]
pub struct TopBottomByAxis {
    pub critic: TopBottom,
    pub audience: TopBottom,
    pub club: TopBottom,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub summary: Summary,
    pub top_bottom: TopBottomByAxis,
    pub genres: GenreComparison,
    pub charts: ChartSet,
}

pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatisticsResponse>, StatsError> {
    let dataset = StatsDataset::extract(&state.db, state.config.meeting_metric).await?;

    Ok(Json(StatisticsResponse {
        summary: dataset.summary(),
        top_bottom: TopBottomByAxis {
            critic: dataset.top_and_bottom(RatingAxis::Critic, DEFAULT_RANKING_SIZE),
            audience: dataset.top_and_bottom(RatingAxis::Audience, DEFAULT_RANKING_SIZE),
            club: dataset.top_and_bottom(RatingAxis::Club, DEFAULT_RANKING_SIZE),
        },
        genres: dataset.outstanding_genres(DEFAULT_GENRE_COLUMNS),
        charts: dataset.charts(RatingAxis::Critic),
    }))
}

// --- bar ---

pub async fn list_ingredients(State(state): State<Arc<AppState>>) -> JsonResult<Vec<IngredientView>> {
    Ok(Json(handlers::ingredient::get_all(&state.db).await?))
}

pub async fn create_ingredient(
    State(state): State<Arc<AppState>>,
    Json(input): Json<IngredientInput>,
) -> JsonResult<IngredientView> {
    Ok(Json(handlers::ingredient::create(&state.db, &input).await?))
}

pub async fn get_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<IngredientView> {
    Ok(Json(handlers::ingredient::get(&state.db, id).await?))
}

pub async fn update_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<IngredientInput>,
) -> JsonResult<IngredientView> {
    Ok(Json(handlers::ingredient::update(&state.db, id, &input).await?))
}

pub async fn delete_ingredient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    let deleted = handlers::ingredient::delete(&state.db, id).await?;
    Ok(Json(json!({ "success": true, "id": deleted })))
}

pub async fn list_cocktails(State(state): State<Arc<AppState>>) -> JsonResult<Vec<CocktailView>> {
    Ok(Json(handlers::cocktail::get_all(&state.db).await?))
}

pub async fn create_cocktail(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CocktailInput>,
) -> JsonResult<CocktailView> {
    Ok(Json(handlers::cocktail::create(&state.db, &input).await?))
}

pub async fn get_cocktail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<CocktailView> {
    Ok(Json(handlers::cocktail::get(&state.db, id).await?))
}

pub async fn update_cocktail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<CocktailInput>,
) -> JsonResult<CocktailView> {
    Ok(Json(handlers::cocktail::update(&state.db, id, &input).await?))
}

pub async fn delete_cocktail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    let deleted = handlers::cocktail::delete(&state.db, id).await?;
    Ok(Json(json!({ "success": true, "id": deleted })))
}

pub async fn cocktail_ingredients(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<Vec<CocktailIngredientView>> {
    Ok(Json(handlers::cocktail::ingredients(&state.db, id).await?))
}

pub async fn ingredient_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    let available = handlers::ingredient::availability(&state.db, id).await?;
    Ok(Json(json!({ "id": id, "is_available": available })))
}

pub async fn cocktail_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> JsonResult<serde_json::Value> {
    let available = handlers::cocktail::availability(&state.db, id).await?;
    Ok(Json(json!({ "id": id, "is_available": available })))
}
