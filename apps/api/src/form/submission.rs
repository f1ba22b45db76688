#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::form::photo::PhotoField;
use crate::models::cv::{CvPayload, CvRecord};

/// A validated form result, ready to be serialized for transport.
#[derive(Debug, Clone, Default)]
pub struct CvSubmission {
    pub payload: CvPayload,
    pub photo: PhotoField,
}

impl CvSubmission {
    /// Rebuilds a submission from a fetched record, e.g. for the favorite
    /// toggle, which resubmits the record otherwise unchanged.
    pub fn from_record(record: &CvRecord) -> Self {
        CvSubmission {
            payload: CvPayload {
                personal_info: Some(record.personal_info.clone()),
                summary: record.summary.clone(),
                experiences: Some(record.experiences.clone()),
                educations: Some(record.educations.clone()),
                skills: Some(record.skills.clone()),
                is_favorite: Some(record.is_favorite),
            },
            photo: match &record.personal_info.photo {
                Some(reference) => PhotoField::Keep(reference.clone()),
                None => PhotoField::Remove,
            },
        }
    }

    /// The `cvData` part: the structured fields as one JSON blob. A kept
    /// reference rides inside the JSON; a new upload never does — the binary
    /// goes in its own part and the JSON drops the photo key entirely.
    pub fn cv_data_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(&self.payload)?;
        if let Some(info) = value
            .get_mut("personalInfo")
            .and_then(|v| v.as_object_mut())
        {
            match &self.photo {
                PhotoField::Keep(reference) => {
                    info.insert("photo".to_string(), json!(reference));
                }
                PhotoField::Replace(_) | PhotoField::Remove => {
                    info.remove("photo");
                }
            }
        }
        Ok(serde_json::to_string(&value)?)
    }

    /// Assembles the multipart form: `cvData` JSON, plus the photo binary
    /// for a new upload or the `existingPhoto` field for a kept reference.
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new().text("cvData", self.cv_data_json()?);
        match self.photo {
            PhotoField::Replace(upload) => {
                let part = Part::bytes(upload.bytes.to_vec())
                    .file_name(upload.file_name)
                    .mime_str(&upload.content_type)
                    .context("invalid photo content type")?;
                form = form.part("photo", part);
            }
            PhotoField::Keep(reference) => {
                form = form.text("existingPhoto", reference);
            }
            PhotoField::Remove => {}
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::form::photo::PhotoUpload;
    use crate::models::cv::PersonalInfo;

    fn base_submission() -> CvSubmission {
        CvSubmission {
            payload: CvPayload {
                personal_info: Some(PersonalInfo {
                    first_name: "Jean".to_string(),
                    last_name: "Dupont".to_string(),
                    profession: "Développeur".to_string(),
                    email: "jean.dupont@example.com".to_string(),
                    ..Default::default()
                }),
                skills: Some(vec!["Rust".to_string()]),
                ..Default::default()
            },
            photo: PhotoField::Remove,
        }
    }

    #[test]
    fn test_cv_data_json_omits_photo_without_keep() {
        let submission = base_submission();
        let value: serde_json::Value =
            serde_json::from_str(&submission.cv_data_json().unwrap()).unwrap();
        assert!(value["personalInfo"].get("photo").is_none());
        assert_eq!(value["personalInfo"]["firstName"], "Jean");
    }

    #[test]
    fn test_cv_data_json_omits_photo_for_upload() {
        let mut submission = base_submission();
        submission.photo = PhotoField::Replace(PhotoUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"bytes"),
        });
        let value: serde_json::Value =
            serde_json::from_str(&submission.cv_data_json().unwrap()).unwrap();
        assert!(value["personalInfo"].get("photo").is_none());
    }

    #[test]
    fn test_cv_data_json_carries_kept_reference() {
        let mut submission = base_submission();
        submission.photo = PhotoField::Keep("/api/image/me.png".to_string());
        let value: serde_json::Value =
            serde_json::from_str(&submission.cv_data_json().unwrap()).unwrap();
        assert_eq!(value["personalInfo"]["photo"], "/api/image/me.png");
    }

    #[test]
    fn test_from_record_maps_photo_to_keep() {
        let mut record = crate::models::cv::CvRecord::from_payload(
            "1".to_string(),
            base_submission().payload,
            chrono::Utc::now(),
        );
        record.personal_info.photo = Some("/api/image/me.png".to_string());

        let submission = CvSubmission::from_record(&record);
        assert!(matches!(&submission.photo, PhotoField::Keep(r) if r == "/api/image/me.png"));
        assert_eq!(submission.payload.is_favorite, Some(false));
        assert_eq!(submission.payload.skills.as_deref(), Some(&["Rust".to_string()][..]));
    }

    #[test]
    fn test_into_form_builds() {
        let mut submission = base_submission();
        submission.photo = PhotoField::Replace(PhotoUpload {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"bytes"),
        });
        assert!(submission.into_form().is_ok());
    }
}
