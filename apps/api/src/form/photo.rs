#![allow(dead_code)]

use bytes::Bytes;

/// A newly selected photo file, held in memory until submission.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// The polymorphic photo field, resolved once at the boundary instead of
/// re-inspecting raw shapes throughout.
///
/// - `Keep`: an already-stored reference passes through unchanged and is
///   never re-uploaded.
/// - `Replace`: a new binary rides along as a separate multipart part.
/// - `Remove`: no photo (or the association is being dropped).
#[derive(Debug, Clone, Default)]
pub enum PhotoField {
    Keep(String),
    Replace(PhotoUpload),
    #[default]
    Remove,
}

/// What the editing session should render as the photo preview.
#[derive(Debug, PartialEq, Eq)]
pub enum Preview<'a> {
    /// A freshly selected file, previewed straight from its bytes.
    Pending(&'a Bytes),
    /// An already-stored photo, previewed via its serving reference.
    Stored(&'a str),
}

/// Transient photo-selection state for one editing session. Local to the
/// session and discarded on navigation — never part of the persisted model.
///
/// Superseding or clearing a selection drops the pending upload, releasing
/// the preview buffer with it.
#[derive(Debug, Default)]
pub struct PhotoState {
    field: PhotoField,
}

impl PhotoState {
    /// Initial state when editing an existing record.
    pub fn from_record(photo: Option<&str>) -> Self {
        PhotoState {
            field: match photo {
                Some(reference) => PhotoField::Keep(reference.to_string()),
                None => PhotoField::Remove,
            },
        }
    }

    /// The user picked a file. Any prior selection is released.
    pub fn select(&mut self, upload: PhotoUpload) {
        self.field = PhotoField::Replace(upload);
    }

    /// The user removed the photo, whether stored or freshly selected.
    pub fn clear(&mut self) {
        self.field = PhotoField::Remove;
    }

    pub fn field(&self) -> &PhotoField {
        &self.field
    }

    /// Consumes the session state into the submission's photo field.
    pub fn into_field(self) -> PhotoField {
        self.field
    }

    pub fn preview(&self) -> Option<Preview<'_>> {
        match &self.field {
            PhotoField::Replace(upload) => Some(Preview::Pending(&upload.bytes)),
            PhotoField::Keep(reference) => Some(Preview::Stored(reference)),
            PhotoField::Remove => None,
        }
    }
}
