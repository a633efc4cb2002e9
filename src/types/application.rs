// src/types/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::optimistic::{Entity, Patch};
use crate::types::interview::Interview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    InProcess,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::InProcess => "IN_PROCESS",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    /// Sort key used when listing: offers first, then open processes
    pub fn display_rank(&self) -> u8 {
        match self {
            ApplicationStatus::Offer => 0,
            ApplicationStatus::InProcess => 1,
            ApplicationStatus::Rejected => 2,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "IN_PROCESS" | "INPROCESS" | "OPEN" => Ok(ApplicationStatus::InProcess),
            "OFFER" => Ok(ApplicationStatus::Offer),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => anyhow::bail!(
                "Unknown application status: {}. Use IN_PROCESS, OFFER or REJECTED",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub current_status: ApplicationStatus,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub jd_analysis: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviews: Option<Vec<Interview>>,
}

impl Application {
    pub fn interview_count(&self) -> usize {
        self.interviews.as_ref().map(Vec::len).unwrap_or(0)
    }
}

impl Entity for Application {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplicationRequest {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<ApplicationStatus>,
}

/// Partial update; `None` fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateApplicationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jd_analysis: Option<String>,
}

impl UpdateApplicationRequest {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            current_status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Patch<Application> for UpdateApplicationRequest {
    fn apply_to(&self, target: &Application) -> Application {
        let mut next = target.clone();
        if let Some(company_name) = &self.company_name {
            next.company_name = company_name.clone();
        }
        if let Some(job_title) = &self.job_title {
            next.job_title = job_title.clone();
        }
        if let Some(status) = self.current_status {
            next.current_status = status;
        }
        if let Some(salary) = &self.salary {
            next.salary = salary.clone();
        }
        if let Some(job_description) = &self.job_description {
            next.job_description = job_description.clone();
        }
        if let Some(jd_analysis) = &self.jd_analysis {
            next.jd_analysis = jd_analysis.clone();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&ApplicationStatus::InProcess).unwrap();
        assert_eq!(json, "\"IN_PROCESS\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"OFFER\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Offer);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            "in-process".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::InProcess
        );
        assert_eq!(
            "rejected".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Rejected
        );
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_deserialize_backend_payload() {
        let body = r#"{
            "id": 7,
            "company_name": "Acme",
            "job_title": "Backend Engineer",
            "current_status": "IN_PROCESS",
            "salary": "",
            "job_description": "",
            "jd_analysis": "",
            "created_at": "2024-02-01T09:30:00+08:00",
            "updated_at": "2024-02-02T10:00:00+08:00",
            "interviews": [{
                "id": 3,
                "application_id": 7,
                "round_name": "Tech 1",
                "start_time": "2024-02-08T14:00:00+08:00",
                "end_time": "2024-02-08T15:00:00+08:00",
                "status": "SCHEDULED",
                "meeting_link": "",
                "review_content": "",
                "created_at": "2024-02-01T09:30:00+08:00",
                "updated_at": "2024-02-01T09:30:00+08:00"
            }]
        }"#;
        let app: Application = serde_json::from_str(body).unwrap();
        assert_eq!(app.id, 7);
        assert_eq!(app.interview_count(), 1);
        assert_eq!(app.created_at.to_rfc3339(), "2024-02-01T01:30:00+00:00");
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let patch = UpdateApplicationRequest::status(ApplicationStatus::Offer);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "current_status": "OFFER" }));
        assert!(!patch.is_empty());
        assert!(UpdateApplicationRequest::default().is_empty());
    }
}
