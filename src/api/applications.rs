// src/api/applications.rs
use reqwest::Method;

use crate::core::{ApiClient, ApiError};
use crate::types::{
    Application, ApplicationStatus, CreateApplicationRequest, MessageResponse,
    UpdateApplicationRequest,
};

const APPLICATIONS_ENDPOINT: &str = "/applications";

pub struct ApplicationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ApplicationApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Query string the backend expects: `keyword` and comma-joined `status`
    pub fn list_query(
        keyword: Option<&str>,
        statuses: &[ApplicationStatus],
    ) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }
        if !statuses.is_empty() {
            let joined = statuses
                .iter()
                .map(ApplicationStatus::as_str)
                .collect::<Vec<_>>()
                .join(",");
            query.push(("status", joined));
        }
        query
    }

    pub async fn list(
        &self,
        keyword: Option<&str>,
        statuses: &[ApplicationStatus],
    ) -> Result<Vec<Application>, ApiError> {
        let builder = self
            .client
            .request(Method::GET, APPLICATIONS_ENDPOINT)?
            .query(&Self::list_query(keyword, statuses));
        self.client.send(builder).await
    }

    pub async fn get(&self, id: i64) -> Result<Application, ApiError> {
        let builder = self
            .client
            .request(Method::GET, &format!("{}/{}", APPLICATIONS_ENDPOINT, id))?;
        self.client.send(builder).await
    }

    pub async fn create(&self, request: &CreateApplicationRequest) -> Result<Application, ApiError> {
        let builder = self
            .client
            .request(Method::POST, APPLICATIONS_ENDPOINT)?
            .json(request);
        self.client.send(builder).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: &UpdateApplicationRequest,
    ) -> Result<Application, ApiError> {
        let builder = self
            .client
            .request(Method::PUT, &format!("{}/{}", APPLICATIONS_ENDPOINT, id))?
            .json(request);
        self.client.send(builder).await
    }

    /// Deletes the application; the backend removes its interviews too
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let builder = self
            .client
            .request(Method::DELETE, &format!("{}/{}", APPLICATIONS_ENDPOINT, id))?;
        let _: MessageResponse = self.client.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query() {
        assert!(ApplicationApi::list_query(None, &[]).is_empty());
        assert!(ApplicationApi::list_query(Some("  "), &[]).is_empty());

        let query = ApplicationApi::list_query(
            Some(" acme "),
            &[ApplicationStatus::InProcess, ApplicationStatus::Offer],
        );
        assert_eq!(
            query,
            vec![
                ("keyword", "acme".to_string()),
                ("status", "IN_PROCESS,OFFER".to_string()),
            ]
        );
    }
}
