use axum::async_trait;
use sqlx::postgres::PgQueryResult;
use tracing::{instrument, trace};

use crate::datasource::{Result, SeriesStore, StoreError};
use crate::models::{NewSeries, Series, Vote};
use crate::state::DBPool;

const QUERY_ALL: &str = include_str!("../../queries/series/query_all.sql");
const QUERY_BY_ID: &str = include_str!("../../queries/series/query_by_id.sql");
const INSERT: &str = include_str!("../../queries/series/insert_series.sql");
const UPDATE: &str = include_str!("../../queries/series/update_series.sql");
const DELETE: &str = include_str!("../../queries/series/delete_series.sql");
const UPDATE_STATUS: &str = include_str!("../../queries/series/update_series_status.sql");
const INCREMENT_EPISODE: &str = include_str!("../../queries/series/increment_series_episode.sql");
const ADJUST_SCORE: &str = include_str!("../../queries/series/adjust_series_score.sql");

#[derive(Debug, Clone)]
pub struct PgSeriesStore {
    pool: DBPool,
}

impl PgSeriesStore {
    pub fn new(pool: DBPool) -> Self {
        Self { pool }
    }
}

fn require_row(id: i32, result: &PgQueryResult) -> Result<()> {
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id));
    }
    Ok(())
}

#[async_trait]
impl SeriesStore for PgSeriesStore {
    #[instrument(skip(self), err(level = "debug"))]
    async fn list(&self) -> Result<Vec<Series>> {
        let rows = sqlx::query_as::<_, Series>(QUERY_ALL)
            .fetch_all(&self.pool)
            .await?;
        trace!(count = rows.len(), "loaded series");
        Ok(rows)
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn get(&self, id: i32) -> Result<Series> {
        sqlx::query_as::<_, Series>(QUERY_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn create(&self, series: NewSeries) -> Result<Series> {
        let row = sqlx::query_as::<_, Series>(INSERT)
            .bind(series.title)
            .bind(series.description)
            .bind(series.current_episode)
            .bind(series.total_episodes)
            .bind(series.status)
            .bind(series.score)
            .fetch_one(&self.pool)
            .await?;
        trace!(id = row.id, "inserted series");
        Ok(row)
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn replace(&self, id: i32, series: NewSeries) -> Result<()> {
        let result = sqlx::query(UPDATE)
            .bind(id)
            .bind(series.title)
            .bind(series.description)
            .bind(series.current_episode)
            .bind(series.total_episodes)
            .bind(series.status)
            .bind(series.score)
            .execute(&self.pool)
            .await?;
        require_row(id, &result)
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        require_row(id, &result)
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn set_status(&self, id: i32, status: String) -> Result<()> {
        let result = sqlx::query(UPDATE_STATUS)
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        require_row(id, &result)
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn increment_episode(&self, id: i32) -> Result<Series> {
        sqlx::query_as::<_, Series>(INCREMENT_EPISODE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self), err(level = "debug"))]
    async fn adjust_score(&self, id: i32, vote: Vote) -> Result<Series> {
        sqlx::query_as::<_, Series>(ADJUST_SCORE)
            .bind(id)
            .bind(vote.delta())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }
}
