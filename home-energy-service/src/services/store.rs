//! Home record store abstraction.

use crate::models::{CreateHome, Home};
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Persistence of home profiles.
///
/// `create_home` writes the whole row or nothing; `get_home` reports a
/// missing id as `Ok(None)`.
#[async_trait]
pub trait HomeStore: Send + Sync {
    async fn create_home(&self, input: &CreateHome) -> Result<Home, AppError>;

    async fn get_home(&self, id: i64) -> Result<Option<Home>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Process-local store backing the integration tests.
#[derive(Default)]
pub struct InMemoryHomeStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    homes: BTreeMap<i64, Home>,
}

impl InMemoryHomeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.homes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl HomeStore for InMemoryHomeStore {
    async fn create_home(&self, input: &CreateHome) -> Result<Home, AppError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let home = Home {
            id: inner.last_id,
            size_sqm: input.size_sqm,
            year_built: input.year_built,
            heating_type: input.heating_type,
            insulation: input.insulation,
            notes: input.notes.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.homes.insert(home.id, home.clone());

        Ok(home)
    }

    async fn get_home(&self, id: i64) -> Result<Option<Home>, AppError> {
        Ok(self.inner.read().await.homes.get(&id).cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
