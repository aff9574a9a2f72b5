use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    platform::MediaLocator,
    service::{FailureKind, ResolveRequest},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub id: String,
    pub request: ResolveRequest,
    pub created_at: DateTime<Utc>,
}

impl DownloadTask {
    pub fn new(request: ResolveRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskStatus {
    Queued,
    Running,
    Completed {
        locator: MediaLocator,
        path: String,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        kind: Option<FailureKind>,
        error: String,
    },
}

impl TaskStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// Status of a download task as reported to clients. Lives in memory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRecord {
    pub id: String,
    pub url: String,
    pub platform: String,
    pub option: String,
    #[serde(flatten)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn queued(task: &DownloadTask) -> Self {
        Self {
            id: task.id.clone(),
            url: task.request.url.clone(),
            platform: task.request.platform.clone(),
            option: task.request.option.clone(),
            status: TaskStatus::Queued,
            created_at: task.created_at,
            updated_at: task.created_at,
        }
    }
}
