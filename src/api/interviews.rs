// src/api/interviews.rs
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Method;

use crate::core::{ApiClient, ApiError};
use crate::types::{
    CreateInterviewRequest, Interview, MessageResponse, UpdateInterviewRequest,
    UpdateReviewRequest,
};

const INTERVIEWS_ENDPOINT: &str = "/interviews";

pub struct InterviewApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InterviewApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list_query(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Vec<(&'static str, String)> {
        [("start", start), ("end", end)]
            .into_iter()
            .filter_map(|(key, time)| {
                time.map(|t| (key, t.to_rfc3339_opts(SecondsFormat::Secs, true)))
            })
            .collect()
    }

    pub async fn list(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Interview>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, INTERVIEWS_ENDPOINT)?
            .query(&Self::list_query(start, end));
        self.client.send(builder).await
    }

    pub async fn get(&self, id: i64) -> Result<Interview, ApiError> {
        let builder = self
            .client
            .request(Method::GET, &format!("{}/{}", INTERVIEWS_ENDPOINT, id))?;
        self.client.send(builder).await
    }

    pub async fn create(&self, request: &CreateInterviewRequest) -> Result<Interview, ApiError> {
        let builder = self
            .client
            .request(Method::POST, INTERVIEWS_ENDPOINT)?
            .json(request);
        self.client.send(builder).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: &UpdateInterviewRequest,
    ) -> Result<Interview, ApiError> {
        let builder = self
            .client
            .request(Method::PUT, &format!("{}/{}", INTERVIEWS_ENDPOINT, id))?
            .json(request);
        self.client.send(builder).await
    }

    pub async fn update_review(&self, id: i64, review_content: &str) -> Result<Interview, ApiError> {
        let body = UpdateReviewRequest {
            review_content: review_content.to_string(),
        };
        let builder = self
            .client
            .request(Method::PATCH, &format!("{}/{}/review", INTERVIEWS_ENDPOINT, id))?
            .json(&body);
        self.client.send(builder).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let builder = self
            .client
            .request(Method::DELETE, &format!("{}/{}", INTERVIEWS_ENDPOINT, id))?;
        let _: MessageResponse = self.client.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_list_query_formats_rfc3339() {
        let start = Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap();
        let query = InterviewApi::list_query(Some(start), None);
        assert_eq!(query, vec![("start", "2024-02-05T00:00:00Z".to_string())]);
        assert!(InterviewApi::list_query(None, None).is_empty());
    }
}
