//! User status entity - online presence as reported by the server

use serde::{Deserialize, Serialize};

/// User online status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// User is online and active
    Online,
    /// User is idle (away from keyboard)
    Away,
    /// Do not disturb
    Dnd,
    #[default]
    Offline,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Away => write!(f, "away"),
            Self::Dnd => write!(f, "dnd"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

/// Status of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub user_id: String,
    pub status: StatusKind,
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub last_activity_at: i64,
}

impl UserStatus {
    pub fn new(user_id: impl Into<String>, status: StatusKind) -> Self {
        Self {
            user_id: user_id.into(),
            status,
            manual: false,
            last_activity_at: 0,
        }
    }
}
