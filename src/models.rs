use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Series {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub current_episode: i32,
    pub total_episodes: i32,
    pub status: String,
    pub score: i32,
}

/// A series as supplied by a client, before the store has assigned an id.
///
/// Missing fields fall back to their zero value and unknown fields (including
/// `id`) are ignored, so no payload is rejected for its content.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NewSeries {
    pub title: String,
    pub description: String,
    pub current_episode: i32,
    pub total_episodes: i32,
    pub status: String,
    pub score: i32,
}

impl NewSeries {
    pub fn with_id(self, id: i32) -> Series {
        Series {
            id,
            title: self.title,
            description: self.description,
            current_episode: self.current_episode,
            total_episodes: self.total_episodes,
            status: self.status,
            score: self.score,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn delta(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }
}
