pub mod cocktail;
pub mod ingredient;
pub mod movie;
pub mod note;
pub mod postcard;
pub mod user;
