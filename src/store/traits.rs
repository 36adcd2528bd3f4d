//! `KeyValueStore` trait — the single async interface for persisted state.
//!
//! Every console collection (clients, users, roles, stock kiosks) lives as
//! one JSON value under a fixed key. Writes overwrite the whole value.

use async_trait::async_trait;

use crate::error::StoreError;

/// Backend-agnostic key-value store holding JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), StoreError>;

    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}
