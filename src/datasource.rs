use std::fmt::Debug;
use std::sync::Arc;

use axum::async_trait;

use crate::models::{NewSeries, Series, Vote};

pub mod memory;
pub mod repository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("series {0} not found")]
    NotFound(i32),
    #[error("{column} of series {id} is out of range")]
    OutOfRange { id: i32, column: &'static str },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Persistence for [`Series`] rows.
///
/// Every method maps to one atomic statement against the backing store.
/// Relative updates ([`SeriesStore::increment_episode`],
/// [`SeriesStore::adjust_score`]) are applied by the store itself and return
/// the row as it was written.
#[async_trait]
pub trait SeriesStore: Debug + Send + Sync {
    async fn list(&self) -> Result<Vec<Series>>;
    async fn get(&self, id: i32) -> Result<Series>;
    async fn create(&self, series: NewSeries) -> Result<Series>;
    async fn replace(&self, id: i32, series: NewSeries) -> Result<()>;
    async fn delete(&self, id: i32) -> Result<()>;
    async fn set_status(&self, id: i32, status: String) -> Result<()>;
    async fn increment_episode(&self, id: i32) -> Result<Series>;
    async fn adjust_score(&self, id: i32, vote: Vote) -> Result<Series>;
}

pub type SharedStore = Arc<dyn SeriesStore>;
