use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};

use crate::entities::api_cache;

/// TTL'd key/value cache for external API payloads, backed by the primary
/// store. Constructed once at startup and passed to whoever needs it; there
/// is no process-global instance.
#[derive(Clone)]
pub struct ApiCache {
    db: DatabaseConnection,
    ttl_seconds: i64,
}

impl ApiCache {
    pub fn new(db: DatabaseConnection, ttl_seconds: i64) -> Self {
        Self { db, ttl_seconds }
    }

    /// Fetch a cached payload. Entries older than the TTL are treated as
    /// absent; expiry is the only invalidation.
    pub async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, DbErr> {
        let row = api_cache::Entity::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(row
            .filter(|r| self.is_fresh(r.cached_at))
            .and_then(|r| serde_json::from_str(&r.payload).ok()))
    }

    pub async fn put(&self, key: &str, payload: &serde_json::Value) -> Result<(), DbErr> {
        let model = api_cache::ActiveModel {
            cache_key: Set(key.to_string()),
            payload: Set(payload.to_string()),
            cached_at: Set(now_sec()),
        };

        api_cache::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(api_cache::Column::CacheKey)
                    .update_columns([api_cache::Column::Payload, api_cache::Column::CachedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    fn is_fresh(&self, cached_at: i64) -> bool {
        now_sec().saturating_sub(cached_at) <= self.ttl_seconds
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
