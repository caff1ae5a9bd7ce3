use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::debug;

use crate::{cache::ApiCache, error::HandlerError};

#[derive(Debug, thiserror::Error)]
pub enum KpError {
    #[error("metadata API token is not configured")]
    MissingToken,

    #[error("metadata API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("metadata API returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("metadata cache error: {0}")]
    Cache(#[from] sea_orm::DbErr),
}

impl From<KpError> for HandlerError {
    fn from(err: KpError) -> Self {
        HandlerError::Unavailable(err.to_string())
    }
}

/// Client for the film database API. Requests are rate limited and every
/// response goes through the TTL'd [`ApiCache`] keyed by request URL, so a
/// page refresh within the TTL does not hit the network again.
pub struct KpClient {
    client: reqwest::Client,
    api_token: String,
    base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    cache: ApiCache,
}

impl KpClient {
    pub fn new(client: reqwest::Client, api_token: String, base_url: String, rps: u32, cache: ApiCache) -> Self {
        if api_token.trim().is_empty() {
            tracing::warn!("no KP_API_TOKEN provided; movie imports will fail");
        }

        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_token, base_url, limiter, cache }
    }

    pub async fn get_movie(&self, kp_id: i32) -> Result<KpMovie, KpError> {
        if self.api_token.trim().is_empty() {
            return Err(KpError::MissingToken);
        }

        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), kp_id);

        if let Some(hit) = self.cache.get(&url).await? {
            debug!(kp_id = kp_id, "metadata cache hit");
            return Ok(serde_json::from_value(hit)?);
        }

        self.limiter.until_ready().await;

        let payload: serde_json::Value = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.cache.put(&url, &payload).await?;
        debug!(kp_id = kp_id, "fetched movie metadata");

        Ok(serde_json::from_value(payload)?)
    }
}

/// The slice of the film database payload the catalog keeps. Every field is
/// optional except the id; the importer fills defaults for the rest.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KpMovie {
    #[serde(default = "missing_id")]
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub slogan: Option<String>,
    pub movie_length: Option<i32>,
    pub poster: Option<KpPoster>,
    pub rating: Option<KpRating>,
    pub votes: Option<KpVotes>,
    pub premiere: Option<KpPremiere>,
    pub budget: Option<KpMoney>,
    pub fees: Option<KpFees>,
    pub countries: Vec<KpNamed>,
    pub genres: Vec<KpNamed>,
    pub persons: Vec<KpPerson>,
}

fn missing_id() -> i32 {
    -1
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpPoster {
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpRating {
    pub kp: Option<f64>,
    pub imdb: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpVotes {
    pub kp: Option<i32>,
    pub imdb: Option<i32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpPremiere {
    pub world: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpMoney {
    pub value: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpFees {
    pub world: Option<KpMoney>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct KpNamed {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KpPerson {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub en_profession: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": 326,
        "name": "Побег из Шоушенка",
        "description": "Несправедливо осужденный банкир...",
        "shortDescription": "Тюремная драма",
        "slogan": "Страх - это кандалы. Надежда - это свобода",
        "movieLength": 142,
        "poster": {"url": "https://image.example/326.jpg"},
        "rating": {"kp": 9.1, "imdb": 9.3},
        "votes": {"kp": 950000, "imdb": 2700000},
        "premiere": {"world": "1994-09-10T00:00:00.000Z"},
        "budget": {"value": 25000000},
        "fees": {"world": {"value": 28418687}},
        "countries": [{"name": "США"}],
        "genres": [{"name": "драма"}],
        "persons": [
            {"id": 7987, "name": "Тим Роббинс", "photo": "https://image.example/p.jpg", "enProfession": "actor"},
            {"id": 24262, "name": "Фрэнк Дарабонт", "photo": "", "enProfession": "director"},
            {"id": null, "name": null, "enProfession": "actor"}
        ]
    }"#;

    #[test]
    fn decodes_full_payload() {
        let movie: KpMovie = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(movie.id, 326);
        assert_eq!(movie.movie_length, Some(142));
        assert_eq!(movie.rating.as_ref().unwrap().kp, Some(9.1));
        assert_eq!(movie.fees.unwrap().world.unwrap().value, Some(28418687));
        assert_eq!(movie.genres.len(), 1);
        assert_eq!(movie.persons.len(), 3);
        assert_eq!(movie.persons[1].en_profession.as_deref(), Some("director"));
        assert!(movie.persons[2].id.is_none());
    }

    #[test]
    fn decodes_sparse_payload() {
        let movie: KpMovie = serde_json::from_str(r#"{"id": 42, "name": "Неизвестный"}"#).unwrap();
        assert_eq!(movie.id, 42);
        assert!(movie.rating.is_none());
        assert!(movie.persons.is_empty());
    }
}
