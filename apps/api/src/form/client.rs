#![allow(dead_code)]

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::form::submission::CvSubmission;
use crate::models::cv::CvRecord;

#[derive(Debug, Deserialize)]
struct SuccessBody {
    success: bool,
}

/// Thin HTTP client over the CV store API — the transport the form model
/// submits through. List/detail views re-fetch through it after mutations.
pub struct CvApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl CvApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        CvApiClient {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn list(&self) -> Result<Vec<CvRecord>> {
        let cvs = self
            .http
            .get(format!("{}/api/cvs", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(cvs)
    }

    pub async fn get(&self, id: &str) -> Result<CvRecord> {
        let cv = self
            .http
            .get(format!("{}/api/cv/{id}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(cv)
    }

    pub async fn create(&self, submission: CvSubmission) -> Result<CvRecord> {
        let record = self
            .http
            .post(format!("{}/api/cv", self.base_url))
            .multipart(submission.into_form()?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(record)
    }

    pub async fn update(&self, id: &str, submission: CvSubmission) -> Result<CvRecord> {
        let record = self
            .http
            .put(format!("{}/api/cv/{id}", self.base_url))
            .multipart(submission.into_form()?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(record)
    }

    /// Restricted update: resubmits the record with only `isFavorite`
    /// flipped, keeping any stored photo in place.
    pub async fn toggle_favorite(&self, record: &CvRecord) -> Result<CvRecord> {
        let mut submission = CvSubmission::from_record(record);
        submission.payload.is_favorite = Some(!record.is_favorite);
        self.update(&record.id, submission).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let body: SuccessBody = self
            .http
            .delete(format!("{}/api/cv/{id}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !body.success {
            bail!("delete of CV {id} was not acknowledged");
        }
        Ok(())
    }

    pub async fn delete_photo(&self, id: &str) -> Result<()> {
        let body: SuccessBody = self
            .http
            .delete(format!("{}/api/cv/{id}/photo", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !body.success {
            bail!("photo delete for CV {id} was not acknowledged");
        }
        Ok(())
    }
}
