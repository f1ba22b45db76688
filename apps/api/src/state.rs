use std::sync::{Arc, Mutex};

use crate::cv::photos::PhotoLibrary;
use crate::store::CvStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The store sits behind one mutex: every CRUD operation is a read-modify-write
/// over the whole collection plus a whole-file rewrite, so global serialization
/// is the required granularity.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<CvStore>>,
    pub photos: PhotoLibrary,
}
