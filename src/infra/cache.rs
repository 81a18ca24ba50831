//! Redis cache implementation.
//!
//! Thin JSON-over-Redis layer used by the flash store. Each flash session is
//! a Redis hash whose fields hold serialized JSON values.

use std::collections::HashMap;

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn try_connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Read every field of a hash and delete it in the same transaction.
    pub async fn take_fields<T: DeserializeOwned>(&self, key: &str) -> AppResult<HashMap<String, T>> {
        let mut conn = self.connection.clone();
        let (fields, _deleted): (HashMap<String, String>, i64) = redis::pipe()
            .atomic()
            .hgetall(key)
            .del(key)
            .query_async(&mut conn)
            .await?;

        fields
            .into_iter()
            .map(|(field, json)| Ok((field, decode(key, &json)?)))
            .collect()
    }

    /// Write fields into a hash, leaving other fields in place, and reset
    /// its TTL in seconds.
    pub async fn set_fields_with_ttl<T: Serialize>(
        &self,
        key: &str,
        fields: &HashMap<String, T>,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let items = fields
            .iter()
            .map(|(field, value)| {
                serde_json::to_string(value)
                    .map(|json| (field.clone(), json))
                    .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))
            })
            .collect::<AppResult<Vec<(String, String)>>>()?;

        let mut conn = self.connection.clone();
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(key, &items)
            .ignore()
            .expire(key, i64::try_from(ttl_seconds).unwrap_or(i64::MAX))
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }
}

fn decode<T: DeserializeOwned>(key: &str, json: &str) -> AppResult<T> {
    serde_json::from_str(json).map_err(|e| {
        tracing::warn!(key = %key, "Failed to deserialize cached value: {}", e);
        AppError::internal(format!("Cache deserialization error: {}", e))
    })
}
