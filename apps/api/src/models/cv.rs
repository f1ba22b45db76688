use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One résumé, the root persisted entity.
///
/// `photo` inside [`PersonalInfo`] always serializes (as `null` when absent):
/// clients probe it to decide whether an image exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRecord {
    pub id: String,
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
    #[serde(default)]
    pub educations: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Server-relative reference into the image route (`/api/image/<name>`).
    #[serde(default)]
    pub photo: Option<String>,
}

/// Dates stay as the client-submitted `YYYY-MM-DD` strings. The store does
/// not re-parse them; ordering is enforced client-side by the form model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// The deserialized `cvData` multipart part, for create and update alike.
///
/// Every top-level field is optional. On update, a present field replaces
/// the stored one wholesale — a partial `personalInfo` drops the subfields
/// it omits. That shallow-merge contract is deliberate; do not deepen it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvPayload {
    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experiences: Option<Vec<Experience>>,
    #[serde(default)]
    pub educations: Option<Vec<Education>>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

impl CvRecord {
    /// Materializes a new record from a create payload. The caller owns id
    /// assignment and timestamps; this only fills the client-provided fields.
    pub fn from_payload(id: String, payload: CvPayload, now: DateTime<Utc>) -> Self {
        CvRecord {
            id,
            personal_info: payload.personal_info.unwrap_or_default(),
            summary: payload.summary,
            experiences: payload.experiences.unwrap_or_default(),
            educations: payload.educations.unwrap_or_default(),
            skills: payload.skills.unwrap_or_default(),
            is_favorite: payload.is_favorite.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    /// Shallow-merges an update payload over this record, preserving `id`
    /// and `created_at` and refreshing `updated_at`.
    pub fn apply(&mut self, payload: CvPayload, now: DateTime<Utc>) {
        if let Some(info) = payload.personal_info {
            self.personal_info = info;
        }
        if let Some(summary) = payload.summary {
            self.summary = Some(summary);
        }
        if let Some(experiences) = payload.experiences {
            self.experiences = experiences;
        }
        if let Some(educations) = payload.educations {
            self.educations = educations;
        }
        if let Some(skills) = payload.skills {
            self.skills = skills;
        }
        if let Some(fav) = payload.is_favorite {
            self.is_favorite = fav;
        }
        self.updated_at = now;
    }
}
