pub mod persistence;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::models::cv::{CvPayload, CvRecord, Education, Experience, PersonalInfo};
use crate::store::persistence::Persistence;

/// Owns the authoritative CV collection and its persistence strategy.
///
/// All operations mutate the in-memory vector first, then hand the whole
/// collection to the persistence backend. There is no partial-write
/// protection: a failed persist leaves memory ahead of disk until the next
/// successful mutation.
pub struct CvStore {
    cvs: Vec<CvRecord>,
    persistence: Box<dyn Persistence>,
}

impl CvStore {
    /// Mounts a store over the given backend, seeding it with the default
    /// record when no usable prior state exists.
    pub fn open(persistence: Box<dyn Persistence>) -> Result<Self> {
        let cvs = match persistence.load()? {
            Some(cvs) => {
                info!("Loaded {} CV(s) from backing store", cvs.len());
                cvs
            }
            None => {
                let seed = seed_cvs();
                persistence.persist(&seed)?;
                info!("No prior state; seeded {} CV(s)", seed.len());
                seed
            }
        };
        Ok(CvStore { cvs, persistence })
    }

    pub fn list(&self) -> Vec<CvRecord> {
        self.cvs.clone()
    }

    pub fn get(&self, id: &str) -> Option<CvRecord> {
        self.cvs.iter().find(|cv| cv.id == id).cloned()
    }

    /// Assigns identity and timestamps, appends the record, persists.
    pub fn create(&mut self, payload: CvPayload) -> Result<CvRecord> {
        let now = Utc::now();
        let record = CvRecord::from_payload(self.next_id(), payload, now);
        self.cvs.push(record.clone());
        self.persistence.persist(&self.cvs)?;
        Ok(record)
    }

    /// Shallow-merges the payload over the stored record. `Ok(None)` when no
    /// record carries the id.
    pub fn update(&mut self, id: &str, payload: CvPayload) -> Result<Option<CvRecord>> {
        let Some(record) = self.cvs.iter_mut().find(|cv| cv.id == id) else {
            return Ok(None);
        };
        record.apply(payload, Utc::now());
        let updated = record.clone();
        self.persistence.persist(&self.cvs)?;
        Ok(Some(updated))
    }

    /// Removes the record and returns it so the caller can release any
    /// associated photo file. `Ok(None)` when no record carries the id.
    pub fn delete(&mut self, id: &str) -> Result<Option<CvRecord>> {
        let Some(index) = self.cvs.iter().position(|cv| cv.id == id) else {
            return Ok(None);
        };
        let removed = self.cvs.remove(index);
        self.persistence.persist(&self.cvs)?;
        Ok(Some(removed))
    }

    /// Rewrites only the photo reference on one record, refreshing
    /// `updated_at`. `Ok(None)` when no record carries the id.
    pub fn set_photo(&mut self, id: &str, photo: Option<String>) -> Result<Option<CvRecord>> {
        let Some(record) = self.cvs.iter_mut().find(|cv| cv.id == id) else {
            return Ok(None);
        };
        record.personal_info.photo = photo;
        record.updated_at = Utc::now();
        let updated = record.clone();
        self.persistence.persist(&self.cvs)?;
        Ok(Some(updated))
    }

    /// Millisecond-timestamp id, bumped until unique within the collection.
    fn next_id(&self) -> String {
        let mut candidate = Utc::now().timestamp_millis();
        while self.cvs.iter().any(|cv| cv.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// The default collection a fresh store starts from.
fn seed_cvs() -> Vec<CvRecord> {
    let now = Utc::now();
    vec![CvRecord {
        id: "1".to_string(),
        personal_info: PersonalInfo {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            profession: "Développeur".to_string(),
            email: "jean.dupont@example.com".to_string(),
            phone: Some("0123456789".to_string()),
            address: Some("123 Rue de Paris".to_string()),
            photo: None,
        },
        summary: Some("Développeur expérimenté avec plus de 5 ans d'expérience".to_string()),
        experiences: vec![Experience {
            company: "Entreprise A".to_string(),
            position: "Développeur Full Stack".to_string(),
            start_date: "2020-01-01".to_string(),
            end_date: Some("2023-01-01".to_string()),
            description: Some("Développement d'applications web".to_string()),
        }],
        educations: vec![Education {
            institution: "Université de Paris".to_string(),
            degree: "Master en Informatique".to_string(),
            start_date: "2016-09-01".to_string(),
            end_date: Some("2019-06-01".to_string()),
        }],
        skills: vec![
            "JavaScript".to_string(),
            "React".to_string(),
            "Node.js".to_string(),
        ],
        is_favorite: false,
        created_at: now,
        updated_at: now,
    }]
}

#[cfg(test)]
mod tests {
    use super::persistence::{Ephemeral, JsonFile};
    use super::*;

    fn payload(first_name: &str) -> CvPayload {
        CvPayload {
            personal_info: Some(PersonalInfo {
                first_name: first_name.to_string(),
                last_name: "Martin".to_string(),
                profession: "Designer".to_string(),
                email: "test@example.com".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn memory_store() -> CvStore {
        CvStore::open(Box::new(Ephemeral)).unwrap()
    }

    #[test]
    fn test_open_seeds_default_record() {
        let store = memory_store();
        let cvs = store.list();
        assert_eq!(cvs.len(), 1);
        assert_eq!(cvs[0].personal_info.first_name, "Jean");
    }

    #[test]
    fn test_create_then_get_roundtrip() {
        let mut store = memory_store();
        let created = store.create(payload("Claire")).unwrap();
        let fetched = store.get(&created.id).unwrap();
        assert_eq!(fetched.personal_info.first_name, "Claire");
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut store = memory_store();
        let a = store.create(payload("A")).unwrap();
        let b = store.create(payload("B")).unwrap();
        let c = store.create(payload("C")).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
    }

    #[test]
    fn test_update_preserves_identity_and_advances_updated_at() {
        let mut store = memory_store();
        let created = store.create(payload("Claire")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let updated = store
            .update(
                &created.id,
                CvPayload {
                    is_favorite: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert!(updated.is_favorite);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn test_update_unknown_id_is_none() {
        let mut store = memory_store();
        assert!(store.update("missing", CvPayload::default()).unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_from_collection() {
        let mut store = memory_store();
        let created = store.create(payload("Claire")).unwrap();
        let removed = store.delete(&created.id).unwrap().unwrap();
        assert_eq!(removed.id, created.id);
        assert!(store.get(&created.id).is_none());
        assert!(store.list().iter().all(|cv| cv.id != created.id));
    }

    #[test]
    fn test_delete_unknown_id_is_none() {
        let mut store = memory_store();
        assert!(store.delete("missing").unwrap().is_none());
    }

    #[test]
    fn test_set_photo_replaces_reference() {
        let mut store = memory_store();
        let created = store.create(payload("Claire")).unwrap();
        let updated = store
            .set_photo(&created.id, Some("/api/image/x.png".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(updated.personal_info.photo.as_deref(), Some("/api/image/x.png"));

        let cleared = store.set_photo(&created.id, None).unwrap().unwrap();
        assert!(cleared.personal_info.photo.is_none());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv-data.json");

        let id = {
            let mut store = CvStore::open(Box::new(JsonFile::new(&path))).unwrap();
            store.create(payload("Claire")).unwrap().id
        };

        let reopened = CvStore::open(Box::new(JsonFile::new(&path))).unwrap();
        let fetched = reopened.get(&id).unwrap();
        assert_eq!(fetched.personal_info.first_name, "Claire");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_seed_and_rewrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv-data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = CvStore::open(Box::new(JsonFile::new(&path))).unwrap();
        assert_eq!(store.list().len(), 1);

        // The seed must have been written back immediately.
        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["cvs"].as_array().unwrap().len(), 1);
        assert_eq!(doc["cvs"][0]["personalInfo"]["firstName"], "Jean");
    }

    #[test]
    fn test_mutations_rewrite_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv-data.json");

        let mut store = CvStore::open(Box::new(JsonFile::new(&path))).unwrap();
        let created = store.create(payload("Claire")).unwrap();
        store.delete(&created.id).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["cvs"].as_array().unwrap().len(), 1);
    }
}
