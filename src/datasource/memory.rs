use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use axum::async_trait;

use crate::datasource::{Result, SeriesStore, StoreError};
use crate::models::{NewSeries, Series, Vote};

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Series>,
}

/// In-process stand-in for the postgres store, used by the HTTP tests.
///
/// Ids are handed out like a `SERIAL` column: starting at 1 and never reused
/// after a delete.
#[derive(Debug, Clone, Default)]
pub struct MemorySeriesStore {
    table: Arc<RwLock<Table>>,
}

impl MemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces row `id` with the result of `f`. The row is left as is when `f` fails.
    fn update<F>(&self, id: i32, f: F) -> Result<Series>
    where
        F: FnOnce(&Series) -> Result<Series>,
    {
        let mut table = self.table.write().expect("RWLock should never be poisoned");
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *row = f(row)?;
        Ok(row.clone())
    }
}

#[async_trait]
impl SeriesStore for MemorySeriesStore {
    async fn list(&self) -> Result<Vec<Series>> {
        let table = self.table.read().expect("RWLock should never be poisoned");
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Series> {
        let table = self.table.read().expect("RWLock should never be poisoned");
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, series: NewSeries) -> Result<Series> {
        let mut table = self.table.write().expect("RWLock should never be poisoned");
        table.last_id += 1;
        let row = series.with_id(table.last_id);
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn replace(&self, id: i32, series: NewSeries) -> Result<()> {
        self.update(id, |_| Ok(series.with_id(id)))?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut table = self.table.write().expect("RWLock should never be poisoned");
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn set_status(&self, id: i32, status: String) -> Result<()> {
        self.update(id, |row| {
            Ok(Series {
                status,
                ..row.clone()
            })
        })?;
        Ok(())
    }

    async fn increment_episode(&self, id: i32) -> Result<Series> {
        self.update(id, |row| {
            let current_episode = row
                .current_episode
                .checked_add(1)
                .ok_or(StoreError::OutOfRange {
                    id,
                    column: "current_episode",
                })?;
            Ok(Series {
                current_episode,
                ..row.clone()
            })
        })
    }

    async fn adjust_score(&self, id: i32, vote: Vote) -> Result<Series> {
        self.update(id, |row| {
            let score = row
                .score
                .checked_add(vote.delta())
                .ok_or(StoreError::OutOfRange { id, column: "score" })?;
            Ok(Series {
                score,
                ..row.clone()
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;

    use super::*;

    fn series(title: &str) -> NewSeries {
        NewSeries {
            title: title.into(),
            description: String::new(),
            current_episode: 0,
            total_episodes: 12,
            status: "watching".into(),
            score: 0,
        }
    }

    #[tokio::test]
    async fn get_returns_created_record() {
        let store = MemorySeriesStore::new();
        let created = store.create(series("Foo")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(store.get(created.id).await.unwrap(), series("Foo").with_id(created.id));
    }

    #[tokio::test]
    async fn list_is_empty_then_in_insertion_order() {
        let store = MemorySeriesStore::new();
        assert!(store.list().await.unwrap().is_empty());
        let a = store.create(series("A")).await.unwrap();
        let b = store.create(series("B")).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemorySeriesStore::new();
        let first = store.create(series("A")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(series("B")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(matches!(store.get(first.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn replace_overwrites_every_field_but_id() {
        let store = MemorySeriesStore::new();
        let id = store.create(series("A")).await.unwrap().id;
        let replacement = NewSeries {
            title: "B".into(),
            description: "rewatch".into(),
            current_episode: -1,
            total_episodes: 3,
            status: "anything goes".into(),
            score: 42,
        };
        store.replace(id, replacement.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), replacement.with_id(id));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_and_changes_nothing() {
        let store = MemorySeriesStore::new();
        let existing = store.create(series("A")).await.unwrap();
        let missing = existing.id + 1;

        assert!(matches!(store.get(missing).await, Err(StoreError::NotFound(id)) if id == missing));
        assert!(matches!(store.replace(missing, series("B")).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(missing).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.set_status(missing, "dropped".into()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.increment_episode(missing).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.adjust_score(missing, Vote::Down).await,
            Err(StoreError::NotFound(_))
        ));

        assert_eq!(store.list().await.unwrap(), vec![existing]);
    }

    #[tokio::test]
    async fn set_status_only_touches_status() {
        let store = MemorySeriesStore::new();
        let created = store.create(series("A")).await.unwrap();
        store.set_status(created.id, "completed".into()).await.unwrap();
        let updated = store.get(created.id).await.unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.score, created.score);
    }

    #[tokio::test]
    async fn votes_cancel_out() {
        let store = MemorySeriesStore::new();
        let id = store.create(series("A")).await.unwrap().id;
        assert_eq!(store.adjust_score(id, Vote::Up).await.unwrap().score, 1);
        assert_eq!(store.adjust_score(id, Vote::Down).await.unwrap().score, 0);
        assert_eq!(store.adjust_score(id, Vote::Down).await.unwrap().score, -1);
    }

    #[tokio::test]
    async fn overflowing_updates_fail_and_keep_the_row() {
        let store = MemorySeriesStore::new();
        let maxed = store
            .create(NewSeries {
                current_episode: i32::MAX,
                ..series("A")
            })
            .await
            .unwrap();
        let floored = store
            .create(NewSeries {
                score: i32::MIN,
                ..series("B")
            })
            .await
            .unwrap();

        assert!(matches!(
            store.increment_episode(maxed.id).await,
            Err(StoreError::OutOfRange { id, column: "current_episode" }) if id == maxed.id
        ));
        assert!(matches!(
            store.adjust_score(floored.id, Vote::Down).await,
            Err(StoreError::OutOfRange { column: "score", .. })
        ));

        assert_eq!(store.get(maxed.id).await.unwrap(), maxed);
        assert_eq!(store.get(floored.id).await.unwrap(), floored);
        assert_eq!(store.adjust_score(floored.id, Vote::Up).await.unwrap().score, i32::MIN + 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let store = MemorySeriesStore::new();
        let id = store.create(series("A")).await.unwrap().id;
        let other = store.create(series("B")).await.unwrap().id;

        let tasks = (0..50).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store.increment_episode(id).await.unwrap();
                store.adjust_score(other, Vote::Up).await.unwrap();
                store.set_status(other, format!("pass {i}")).await.unwrap();
            })
        });
        for result in join_all(tasks).await {
            result.unwrap();
        }

        assert_eq!(store.get(id).await.unwrap().current_episode, 50);
        assert_eq!(store.get(other).await.unwrap().score, 50);
    }
}
