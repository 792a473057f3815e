use std::result::Result;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::datasource::SharedStore;
use crate::errors::Error;
use crate::models::{Message, NewSeries, Series, StatusUpdate, Vote};

type SeriesId = Result<Path<i32>, PathRejection>;

pub async fn get_collection(State(store): State<SharedStore>) -> Result<Json<Vec<Series>>, Error> {
    Ok(Json(store.list().await?))
}

pub async fn get_single(
    id: SeriesId,
    State(store): State<SharedStore>,
) -> Result<Json<Series>, Error> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

pub async fn create(
    State(store): State<SharedStore>,
    body: Result<Json<NewSeries>, JsonRejection>,
) -> Result<(StatusCode, Json<Series>), Error> {
    let Json(series) = body?;
    let created = store.create(series).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn replace(
    id: SeriesId,
    State(store): State<SharedStore>,
    body: Result<Json<NewSeries>, JsonRejection>,
) -> Result<Json<Message>, Error> {
    let Path(id) = id?;
    let Json(series) = body?;
    store.replace(id, series).await?;
    Ok(Json(Message::new("series updated")))
}

pub async fn delete(
    id: SeriesId,
    State(store): State<SharedStore>,
) -> Result<Json<Message>, Error> {
    let Path(id) = id?;
    store.delete(id).await?;
    Ok(Json(Message::new("series deleted")))
}

pub async fn set_status(
    id: SeriesId,
    State(store): State<SharedStore>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Message>, Error> {
    let Path(id) = id?;
    let Json(update) = body?;
    store.set_status(id, update.status).await?;
    Ok(Json(Message::new("status updated")))
}

pub async fn increment_episode(
    id: SeriesId,
    State(store): State<SharedStore>,
) -> Result<Json<Series>, Error> {
    let Path(id) = id?;
    Ok(Json(store.increment_episode(id).await?))
}

pub async fn upvote(id: SeriesId, State(store): State<SharedStore>) -> Result<Json<Series>, Error> {
    vote(id, &store, Vote::Up).await
}

pub async fn downvote(
    id: SeriesId,
    State(store): State<SharedStore>,
) -> Result<Json<Series>, Error> {
    vote(id, &store, Vote::Down).await
}

async fn vote(id: SeriesId, store: &SharedStore, vote: Vote) -> Result<Json<Series>, Error> {
    let Path(id) = id?;
    Ok(Json(store.adjust_score(id, vote).await?))
}
