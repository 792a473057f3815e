use std::sync::Arc;

use anyhow::{anyhow, Result};
use axum::extract::FromRef;
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use url::Url;

use crate::datasource::{SeriesStore, SharedStore};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: SeriesStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(input: &AppState) -> Self {
        input.store.clone()
    }
}

pub type DBPool = Pool<Postgres>;

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed("DB_").from_env()?)
    }

    pub fn url(&self) -> Result<Url> {
        let mut url = Url::parse("postgres://")?;
        url.set_host(Some(&self.host))?;
        url.set_username(&self.user)
            .map_err(|()| anyhow!("username rejected for {}", self.host))?;
        url.set_password(Some(&self.password))
            .map_err(|()| anyhow!("password rejected for {}", self.host))?;
        url.set_port(Some(self.port))
            .map_err(|()| anyhow!("port rejected for {}", self.host))?;
        url.set_path(&self.name);
        Ok(url)
    }
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed("SERVER_").from_env()?)
    }
}

pub async fn create_db_pool(config: &DbConfig) -> Result<DBPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.url()?.as_ref())
        .await?;
    Ok(pool)
}
