#![allow(dead_code)]

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::cv::photos::{ACCEPTED_PHOTO_TYPES, MAX_PHOTO_BYTES, PHOTO_ROUTE_PREFIX};
use crate::form::photo::PhotoField;
use crate::form::submission::CvSubmission;
use crate::models::cv::{Education, Experience, PersonalInfo};

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZàâäéèêëîïôöùûüÿçñÀÂÄÉÈÊËÎÏÔÖÙÛÜŸÇÑ\s\-']+$")
        .expect("static regex: name characters")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex: email")
});

/// Loose international/local phone pattern, e.g. `0612345678` or
/// `+33612345678`, with optional space/hyphen separators.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?\d{1,3}[- ]?)?(\(?\d{2,3}\)?[- ]?)?\d{2}[- ]?\d{2}[- ]?\d{2}[- ]?\d{2}$")
        .expect("static regex: phone")
});

/// One rejected field, addressed by its dotted path in the submission
/// (`personalInfo.firstName`, `experiences[0].endDate`, `skills[2]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// Validates a full submission, so cross-field rules (date ordering,
/// photo-shape disambiguation) see sibling values. Field-at-a-time checks
/// would miss both.
pub fn validate_submission(submission: &CvSubmission) -> ValidationReport {
    let mut errors = Vec::new();

    match &submission.payload.personal_info {
        Some(info) => validate_personal_info(info, &mut errors),
        None => errors.push(FieldError {
            field: "personalInfo".to_string(),
            message: "Personal information is required".to_string(),
        }),
    }

    validate_photo(&submission.photo, &mut errors);

    if let Some(summary) = submission.payload.summary.as_deref() {
        check_max(&mut errors, "summary", summary, 1000);
    }

    for (index, experience) in submission
        .payload
        .experiences
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        validate_experience(index, experience, &mut errors);
    }

    for (index, education) in submission
        .payload
        .educations
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        validate_education(index, education, &mut errors);
    }

    for (index, skill) in submission
        .payload
        .skills
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
    {
        check_range(&mut errors, &format!("skills[{index}]"), skill, 2, 50);
    }

    ValidationReport {
        passed: errors.is_empty(),
        errors,
    }
}

fn validate_personal_info(info: &PersonalInfo, errors: &mut Vec<FieldError>) {
    check_name(errors, "personalInfo.firstName", &info.first_name);
    check_name(errors, "personalInfo.lastName", &info.last_name);
    check_range(errors, "personalInfo.profession", &info.profession, 3, 100);

    if info.email.is_empty() {
        errors.push(FieldError {
            field: "personalInfo.email".to_string(),
            message: "Email is required".to_string(),
        });
    } else if info.email.chars().count() > 255 || !EMAIL_PATTERN.is_match(&info.email) {
        errors.push(FieldError {
            field: "personalInfo.email".to_string(),
            message: "Invalid email address".to_string(),
        });
    }

    if let Some(phone) = info.phone.as_deref().filter(|p| !p.is_empty()) {
        if !PHONE_PATTERN.is_match(phone) {
            errors.push(FieldError {
                field: "personalInfo.phone".to_string(),
                message: "Invalid phone number (e.g. 0612345678 or +33612345678)".to_string(),
            });
        }
    }

    if let Some(address) = info.address.as_deref() {
        check_max(errors, "personalInfo.address", address, 200);
    }
}

fn validate_photo(photo: &PhotoField, errors: &mut Vec<FieldError>) {
    match photo {
        PhotoField::Keep(reference) => {
            if !reference.starts_with(PHOTO_ROUTE_PREFIX) {
                errors.push(FieldError {
                    field: "personalInfo.photo".to_string(),
                    message: "Photo reference must point at a stored image".to_string(),
                });
            }
        }
        PhotoField::Replace(upload) => {
            if !ACCEPTED_PHOTO_TYPES.contains(&upload.content_type.as_str())
                || upload.bytes.len() > MAX_PHOTO_BYTES
            {
                errors.push(FieldError {
                    field: "personalInfo.photo".to_string(),
                    message: "Photo must be JPEG or PNG and under 5MB".to_string(),
                });
            }
        }
        PhotoField::Remove => {}
    }
}

fn validate_experience(index: usize, experience: &Experience, errors: &mut Vec<FieldError>) {
    check_range(
        errors,
        &format!("experiences[{index}].company"),
        &experience.company,
        2,
        100,
    );
    check_range(
        errors,
        &format!("experiences[{index}].position"),
        &experience.position,
        3,
        100,
    );
    if let Some(description) = experience.description.as_deref() {
        check_max(
            errors,
            &format!("experiences[{index}].description"),
            description,
            1000,
        );
    }
    check_dates(
        errors,
        &format!("experiences[{index}]"),
        &experience.start_date,
        experience.end_date.as_deref(),
    );
}

fn validate_education(index: usize, education: &Education, errors: &mut Vec<FieldError>) {
    check_range(
        errors,
        &format!("educations[{index}].institution"),
        &education.institution,
        2,
        100,
    );
    check_range(
        errors,
        &format!("educations[{index}].degree"),
        &education.degree,
        3,
        100,
    );
    check_dates(
        errors,
        &format!("educations[{index}]"),
        &education.start_date,
        education.end_date.as_deref(),
    );
}

/// `startDate` required and parseable; `endDate` optional, parseable, and
/// chronologically ≥ `startDate`.
fn check_dates(errors: &mut Vec<FieldError>, prefix: &str, start: &str, end: Option<&str>) {
    let start_date = parse_date(start);
    if start_date.is_none() {
        errors.push(FieldError {
            field: format!("{prefix}.startDate"),
            message: "Start date is required and must be a valid date".to_string(),
        });
    }

    let Some(end) = end.filter(|e| !e.is_empty()) else {
        return;
    };
    match parse_date(end) {
        None => errors.push(FieldError {
            field: format!("{prefix}.endDate"),
            message: "End date must be a valid date".to_string(),
        }),
        Some(end_date) => {
            if let Some(start_date) = start_date {
                if end_date < start_date {
                    errors.push(FieldError {
                        field: format!("{prefix}.endDate"),
                        message: "End date must be after the start date".to_string(),
                    });
                }
            }
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn check_name(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    check_range(errors, field, value, 2, 50);
    if !value.is_empty() && !NAME_PATTERN.is_match(value) {
        errors.push(FieldError {
            field: field.to_string(),
            message: "Contains invalid characters".to_string(),
        });
    }
}

fn check_range(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    let length = value.chars().count();
    if length == 0 {
        errors.push(FieldError {
            field: field.to_string(),
            message: "This field is required".to_string(),
        });
    } else if length < min {
        errors.push(FieldError {
            field: field.to_string(),
            message: format!("Must contain at least {min} characters"),
        });
    } else if length > max {
        errors.push(FieldError {
            field: field.to_string(),
            message: format!("Must not exceed {max} characters"),
        });
    }
}

fn check_max(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError {
            field: field.to_string(),
            message: format!("Must not exceed {max} characters"),
        });
    }
}
