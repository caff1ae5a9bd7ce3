pub mod actor;
pub mod api_cache;
pub mod app_user;
pub mod cocktail;
pub mod cocktail_ingredient;
pub mod director;
pub mod genre;
pub mod ingredient;
pub mod movie;
pub mod movie_actor;
pub mod movie_director;
pub mod movie_genre;
pub mod movie_writer;
pub mod note;
pub mod postcard;
pub mod postcard_movie;
pub mod writer;
