use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, ValidationError};
use crate::ids::new_id;
use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTarget {
    Post,
    Comment,
    Recipe,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

/// A moderation report filed against community content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "reports")]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub target_type: ReportTarget,
    pub target_id: String,
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
    pub status: ReportStatus,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub target_type: ReportTarget,
    pub target_id: String,
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl Report {
    pub fn new(reporter_id: &str, input: NewReport, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        require("targetId", &input.target_id)?;
        require("reason", &input.reason)?;
        Ok(Report {
            id: new_id("report"),
            reporter_id: reporter_id.to_string(),
            target_type: input.target_type,
            target_id: input.target_id,
            reason: input.reason.trim().to_string(),
            details: input.details,
            status: ReportStatus::Pending,
            resolved_by: None,
            resolution_note: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Record a moderator decision. Leaving `pending` records the moderator.
    pub fn review(
        &mut self,
        moderator_id: &str,
        status: ReportStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.resolved_by = match status {
            ReportStatus::Pending => None,
            _ => Some(moderator_id.to_string()),
        };
        if note.is_some() {
            self.resolution_note = note;
        }
        self.updated_at = now;
    }
}
