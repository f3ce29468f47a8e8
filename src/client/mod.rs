//! Client side of the REST API, consumed by the session controller.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    models::{
        domain::{Answer, Assessment, Submission},
        dto::response::EligibilityResponse,
    },
    services::submission_service::SUBMISSION_NOT_FOUND,
};

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    async fn get_assessment(&self, assessment_id: &str) -> Result<Assessment, ApiClientError>;

    async fn get_submission(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>, ApiClientError>;

    async fn submit_assessment(
        &self,
        assessment_id: &str,
        student_id: &str,
        answers: Vec<Answer>,
        tab_switched: bool,
    ) -> Result<Submission, ApiClientError>;

    async fn eligibility(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> Result<EligibilityResponse, ApiClientError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    student_id: &'a str,
    answers: Vec<Answer>,
    tab_switched: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`AssessmentApi`] over HTTP with a bearer token.
pub struct HttpAssessmentApi {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl HttpAssessmentApi {
    /// `base_url` includes the `/api` prefix, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: &str, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiClientError> {
        let status = response.status();
        let body = response.text().await?;
        decode(status, &body)
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiClientError> {
    if status.is_success() {
        return Ok(serde_json::from_str(body)?);
    }
    Err(status_error(status, body))
}

/// Maps a non-success response to its `{ "error": … }` message, or the
/// status reason when the body carries none.
fn status_error(status: StatusCode, body: &str) -> ApiClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());

    ApiClientError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Only a 404 for the submission itself means "not submitted yet". A 404 for
/// the assessment or an unknown route stays an error.
fn decode_submission(status: StatusCode, body: &str) -> Result<Option<Submission>, ApiClientError> {
    if status == StatusCode::NOT_FOUND {
        return match status_error(status, body) {
            ApiClientError::Status { message, .. } if message == SUBMISSION_NOT_FOUND => Ok(None),
            err => Err(err),
        };
    }
    decode(status, body).map(Some)
}

#[async_trait]
impl AssessmentApi for HttpAssessmentApi {
    async fn get_assessment(&self, assessment_id: &str) -> Result<Assessment, ApiClientError> {
        let response = self
            .client
            .get(self.url(&format!("/assessments/{}", assessment_id)))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn get_submission(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>, ApiClientError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/assessments/{}/submissions/{}",
                assessment_id, student_id
            )))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_submission(status, &body)
    }

    async fn submit_assessment(
        &self,
        assessment_id: &str,
        student_id: &str,
        answers: Vec<Answer>,
        tab_switched: bool,
    ) -> Result<Submission, ApiClientError> {
        let body = SubmitBody {
            student_id,
            answers,
            tab_switched,
        };

        let response = self
            .client
            .post(self.url(&format!("/assessments/{}/submissions", assessment_id)))
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn eligibility(
        &self,
        assessment_id: &str,
        student_id: &str,
    ) -> Result<EligibilityResponse, ApiClientError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/assessments/{}/eligibility/{}",
                assessment_id, student_id
            )))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;
        Self::parse(response).await
    }
}
