use serde::{Deserialize, Serialize};

/// Serialization shape for movie listings: everything, poster-oriented, or
/// the rating-only rows the statistics pipeline consumes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieShape {
    #[default]
    Full,
    Poster,
    Rating,
}

#[derive(Clone, Debug, Serialize)]
pub struct PersonView {
    pub kp_id: i32,
    pub name: String,
    pub photo: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct MovieFullView {
    pub kp_id: i32,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub slogan: String,
    pub countries: Vec<String>,
    pub budget: i64,
    pub fees: i64,
    pub premiere: String,
    pub duration: i32,
    pub poster: String,
    pub rating_kp: String,
    pub rating_imdb: String,
    pub votes_kp: i32,
    pub votes_imdb: i32,
    pub watch_date: Option<String>,
    pub is_archive: bool,
    pub genres: Vec<String>,
    pub actors: Vec<PersonView>,
    pub directors: Vec<PersonView>,
    pub writers: Vec<PersonView>,
}

/// Poster-wall shape: enough to draw the card and its member ratings.
#[derive(Clone, Debug, Serialize)]
pub struct MoviePosterView {
    pub kp_id: i32,
    pub name: String,
    pub poster: String,
    pub genres: Vec<String>,
    pub notes: Vec<NoteView>,
}

/// Rating-only shape consumed by the statistics pipeline. Rating fields stay
/// as the raw catalog text; normalization happens in `stats`.
#[derive(Clone, Debug, Serialize)]
pub struct MovieRatingView {
    pub kp_id: i32,
    pub name: String,
    pub poster: String,
    pub duration: i32,
    pub rating_kp: String,
    pub rating_imdb: String,
    pub votes_kp: i32,
    pub votes_imdb: i32,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum MovieList {
    Full(Vec<MovieFullView>),
    Poster(Vec<MoviePosterView>),
    Rating(Vec<MovieRatingView>),
}

#[derive(Clone, Debug, Serialize)]
pub struct NoteView {
    pub id: i32,
    pub user: i32,
    pub movie: i32,
    pub rating: i32,
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub avatar: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PostcardView {
    pub id: i32,
    pub meeting_date: String,
    pub title: Option<String>,
    pub screenshot: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
    pub movies: Vec<i32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub movie_count: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct IngredientView {
    pub id: i32,
    pub name: String,
    pub is_available: bool,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CocktailIngredientView {
    pub ingredient: IngredientView,
    pub amount: i32,
    pub unit: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CocktailView {
    pub id: i32,
    pub name: String,
    pub instructions: String,
    pub image: Option<String>,
    /// Derived: true when the cocktail has ingredients and all are in stock.
    pub is_available: bool,
    pub ingredients: Vec<CocktailIngredientView>,
}

// --- request bodies ---

#[derive(Debug, Deserialize)]
pub struct ImportMovieRequest {
    pub kp_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct MovieStatusRequest {
    pub kp_id: i32,
    pub is_archive: bool,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub user: i32,
    pub movie: i32,
    pub rating: i32,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveNoteRequest {
    pub user: i32,
    pub movie: i32,
}

#[derive(Debug, Deserialize)]
pub struct PostcardInput {
    pub meeting_date: String,
    pub title: Option<String>,
    pub screenshot: Option<String>,
    #[serde(default)]
    pub movies: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    #[serde(default)]
    pub is_available: bool,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CocktailIngredientInput {
    pub ingredient: i32,
    #[serde(default = "default_amount")]
    pub amount: i32,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_amount() -> i32 {
    1
}

fn default_unit() -> String {
    "ml".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CocktailInput {
    pub name: String,
    pub instructions: String,
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<CocktailIngredientInput>,
}

/// Measurement units the bar understands.
pub const MEASUREMENT_UNITS: [&str; 5] = ["ml", "g", "pcs", "pinch", "slice"];
