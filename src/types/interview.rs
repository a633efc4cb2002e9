// src/types/interview.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::optimistic::{Entity, Patch};
use crate::types::application::Application;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    #[default]
    Scheduled,
    Finished,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "SCHEDULED",
            InterviewStatus::Finished => "FINISHED",
            InterviewStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(InterviewStatus::Scheduled),
            "FINISHED" | "DONE" => Ok(InterviewStatus::Finished),
            "CANCELLED" | "CANCELED" => Ok(InterviewStatus::Cancelled),
            other => anyhow::bail!(
                "Unknown interview status: {}. Use SCHEDULED, FINISHED or CANCELLED",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: i64,
    pub application_id: i64,
    pub round_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: InterviewStatus,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub review_content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<Box<Application>>,
}

impl Interview {
    pub fn is_reviewed(&self) -> bool {
        !self.review_content.trim().is_empty()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.application.as_deref().map(|a| a.company_name.as_str())
    }
}

impl Entity for Interview {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInterviewRequest {
    pub application_id: i64,
    pub round_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateInterviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InterviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_content: Option<String>,
}

impl UpdateInterviewRequest {
    pub fn time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: Some(start),
            end_time: Some(end),
            ..Default::default()
        }
    }

    pub fn status(status: InterviewStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Patch<Interview> for UpdateInterviewRequest {
    fn apply_to(&self, target: &Interview) -> Interview {
        let mut next = target.clone();
        if let Some(round_name) = &self.round_name {
            next.round_name = round_name.clone();
        }
        if let Some(start) = self.start_time {
            next.start_time = start;
        }
        if let Some(end) = self.end_time {
            next.end_time = end;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if let Some(link) = &self.meeting_link {
            next.meeting_link = link.clone();
        }
        if let Some(review) = &self.review_content {
            next.review_content = review.clone();
        }
        next
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub review_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn interview() -> Interview {
        let t = Utc.with_ymd_and_hms(2024, 2, 8, 10, 0, 0).unwrap();
        Interview {
            id: 5,
            application_id: 1,
            round_name: "HR".to_string(),
            start_time: t,
            end_time: t + chrono::Duration::hours(1),
            status: InterviewStatus::Scheduled,
            meeting_link: String::new(),
            review_content: "  ".to_string(),
            created_at: t,
            updated_at: t,
            application: None,
        }
    }

    #[test]
    fn test_time_range_patch_only_touches_times() {
        let original = interview();
        let start = Utc.with_ymd_and_hms(2024, 2, 8, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 8, 15, 0, 0).unwrap();

        let moved = UpdateInterviewRequest::time_range(start, end).apply_to(&original);
        assert_eq!(moved.start_time, start);
        assert_eq!(moved.end_time, end);
        assert_eq!(moved.round_name, original.round_name);
        assert_eq!(moved.status, original.status);
    }

    #[test]
    fn test_whitespace_review_is_not_reviewed() {
        assert!(!interview().is_reviewed());
    }

    #[test]
    fn test_update_serializes_rfc3339() {
        let start = Utc.with_ymd_and_hms(2024, 2, 8, 14, 0, 0).unwrap();
        let patch = UpdateInterviewRequest {
            start_time: Some(start),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "start_time": "2024-02-08T14:00:00Z" }));
    }
}
