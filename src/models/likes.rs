use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A user's reaction to a post or comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LikeStatus {
    #[default]
    None,
    Like,
    Dislike,
}

impl LikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeStatus::None => "None",
            LikeStatus::Like => "Like",
            LikeStatus::Dislike => "Dislike",
        }
    }
}

impl fmt::Display for LikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LikeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(LikeStatus::None),
            "Like" => Ok(LikeStatus::Like),
            "Dislike" => Ok(LikeStatus::Dislike),
            other => Err(AppError::BadRequest(format!("Unknown like status: {}", other))),
        }
    }
}

/// Kind of entity a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

impl FromStr for TargetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            other => Err(AppError::DeserializationError(format!(
                "Unknown like target kind: {}",
                other
            ))),
        }
    }
}

/// At most one record exists per (user_id, target_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeRecord {
    pub user_id: String,
    pub target_id: String,
    pub target_kind: TargetKind,
    pub status: LikeStatus,
    pub added_at: DateTime<Utc>,
}
