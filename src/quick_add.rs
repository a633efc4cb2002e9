// src/quick_add.rs
//! Turn a parsed invitation into an interview, creating the company if needed

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::core::ApiClient;
use crate::llm::ParsedInterview;
use crate::types::{
    Application, ApplicationStatus, CreateApplicationRequest, CreateInterviewRequest, Interview,
    InterviewStatus,
};

const DEFAULT_ROUND_NAME: &str = "Interview";
const DEFAULT_DURATION_MINUTES: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationTarget {
    Existing(i64),
    New(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewDraft {
    pub target: ApplicationTarget,
    pub round_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meeting_link: Option<String>,
}

impl InterviewDraft {
    /// Company must match an existing application name exactly, otherwise
    /// a new application is planned. A missing end time defaults to one
    /// hour after the start.
    pub fn from_parsed(parsed: &ParsedInterview, applications: &[Application]) -> Result<Self> {
        let company = parsed
            .company_name
            .as_deref()
            .context("No company name found in the text")?;
        let start_time = parsed
            .start()
            .context("No usable start time found in the text")?;
        let end_time = parsed
            .end()
            .filter(|end| *end > start_time)
            .unwrap_or_else(|| start_time + Duration::minutes(DEFAULT_DURATION_MINUTES));

        let target = applications
            .iter()
            .find(|app| app.company_name == company)
            .map(|app| ApplicationTarget::Existing(app.id))
            .unwrap_or_else(|| ApplicationTarget::New(company.to_string()));

        Ok(Self {
            target,
            round_name: parsed
                .round_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ROUND_NAME.to_string()),
            start_time,
            end_time,
            meeting_link: parsed.meeting_link.clone(),
        })
    }

    pub async fn submit(&self, client: &ApiClient) -> Result<Interview> {
        let application_id = match &self.target {
            ApplicationTarget::Existing(id) => *id,
            ApplicationTarget::New(company) => {
                let created = client
                    .applications()
                    .create(&CreateApplicationRequest {
                        company_name: company.clone(),
                        job_title: None,
                        current_status: Some(ApplicationStatus::InProcess),
                    })
                    .await
                    .context("Failed to create application")?;
                app_log!(info, "Created application #{} for {}", created.id, company);
                created.id
            }
        };

        let interview = client
            .interviews()
            .create(&CreateInterviewRequest {
                application_id,
                round_name: self.round_name.clone(),
                start_time: self.start_time,
                end_time: self.end_time,
                status: Some(InterviewStatus::Scheduled),
                meeting_link: self.meeting_link.clone(),
                review_content: None,
            })
            .await
            .context("Failed to create interview")?;

        Ok(interview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn app(id: i64, company: &str) -> Application {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Application {
            id,
            company_name: company.to_string(),
            job_title: String::new(),
            current_status: ApplicationStatus::InProcess,
            salary: String::new(),
            job_description: String::new(),
            jd_analysis: String::new(),
            created_at: t,
            updated_at: t,
            interviews: None,
        }
    }

    fn parsed(company: Option<&str>, start: Option<&str>, end: Option<&str>) -> ParsedInterview {
        ParsedInterview {
            company_name: company.map(str::to_string),
            round_name: None,
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            meeting_link: Some("https://meet.example.com/x".to_string()),
            confidence: 0.8,
        }
    }

    #[test]
    fn test_existing_company_is_reused() {
        let apps = vec![app(1, "Acme"), app(2, "Globex")];
        let draft = InterviewDraft::from_parsed(
            &parsed(Some("Globex"), Some("2024-02-08T14:00:00Z"), Some("2024-02-08T14:45:00Z")),
            &apps,
        )
        .unwrap();

        assert_eq!(draft.target, ApplicationTarget::Existing(2));
        assert_eq!(draft.round_name, DEFAULT_ROUND_NAME);
        assert_eq!(draft.end_time - draft.start_time, Duration::minutes(45));
    }

    #[test]
    fn test_unknown_company_and_missing_end() {
        let draft = InterviewDraft::from_parsed(
            &parsed(Some("acme"), Some("2024-02-08T14:00:00Z"), None),
            &[app(1, "Acme")],
        )
        .unwrap();

        assert_eq!(draft.target, ApplicationTarget::New("acme".to_string()));
        assert_eq!(draft.end_time - draft.start_time, Duration::hours(1));
    }

    #[test]
    fn test_missing_fields_are_errors() {
        assert!(InterviewDraft::from_parsed(&parsed(None, Some("2024-02-08T14:00:00Z"), None), &[]).is_err());
        assert!(InterviewDraft::from_parsed(&parsed(Some("Acme"), None, None), &[]).is_err());
    }
}
