//! Card service: the single orchestration point between the HTTP layer and
//! the stores.

use std::sync::Arc;

use tracing::info;

use pinboard_core::{Attachment, Card, CardId};
use pinboard_store::{CardStore, UploadStore, allowed_extension, sanitize_filename};

use crate::error::ServerError;
use crate::session::AdminSession;

/// One uploaded file, fully buffered.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub name: String,
    /// File content.
    pub bytes: Vec<u8>,
}

/// Input for [`CardService::create_card`].
#[derive(Debug, Default)]
pub struct CardDraft {
    /// Card title; must be non-empty after trimming.
    pub title: String,
    /// Card description; may be empty.
    pub description: String,
    /// Zero or more uploaded files.
    pub files: Vec<UploadedFile>,
}

/// Orchestrates card creation and listing over the card log and the upload
/// store. Built once at startup from explicit parts; holds no global state.
pub struct CardService {
    store: Arc<dyn CardStore>,
    uploads: Arc<UploadStore>,
    max_upload_bytes: usize,
}

impl CardService {
    /// Create the service.
    #[must_use]
    pub fn new(
        store: Arc<dyn CardStore>,
        uploads: Arc<UploadStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            uploads,
            max_upload_bytes,
        }
    }

    /// Create a card from an admin submission.
    ///
    /// The whole submission is validated before anything touches disk:
    /// admin session, non-empty title, total upload size, and every file's
    /// name and extension. Any invalid file rejects the submission as a
    /// whole, so a card either appears with all its attachments or not at
    /// all.
    pub async fn create_card(
        &self,
        session: &AdminSession,
        draft: CardDraft,
    ) -> Result<Card, ServerError> {
        session.require_admin()?;

        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ServerError::Validation("title must not be empty".into()));
        }

        let total_bytes: usize = draft.files.iter().map(|f| f.bytes.len()).sum();
        if total_bytes > self.max_upload_bytes {
            return Err(ServerError::PayloadTooLarge);
        }

        // All-or-nothing: validate every filename up front.
        for file in &draft.files {
            let safe = sanitize_filename(&file.name).ok_or_else(|| {
                ServerError::Validation(format!("invalid filename: {:?}", file.name))
            })?;
            if !allowed_extension(&safe) {
                return Err(ServerError::UnsupportedFileType(file.name.clone()));
            }
        }

        let id = CardId::generate();
        let mut attachments = Vec::with_capacity(draft.files.len());
        for file in &draft.files {
            let stored = self.uploads.save(&id, &file.name, &file.bytes).await?;
            attachments.push(Attachment::from_stored_name(stored));
        }

        let card = Card {
            id,
            title: title.to_owned(),
            description: draft.description.trim().to_owned(),
            attachments,
            created_at: chrono::Utc::now(),
        };
        self.store.append(&card).await?;

        info!(
            card_id = %card.id,
            attachments = card.attachments.len(),
            "card published"
        );
        Ok(card)
    }

    /// All cards in insertion order. Display ordering is a caller concern.
    pub async fn list_cards(&self) -> Result<Vec<Card>, ServerError> {
        Ok(self.store.list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pinboard_store::MemoryCardStore;

    fn test_service(max_upload_bytes: usize) -> (tempfile::TempDir, CardService, Arc<dyn CardStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn CardStore> = Arc::new(MemoryCardStore::new());
        let uploads = Arc::new(UploadStore::new(dir.path()));
        let service = CardService::new(Arc::clone(&store), uploads, max_upload_bytes);
        (dir, service, store)
    }

    fn draft(title: &str, files: Vec<UploadedFile>) -> CardDraft {
        CardDraft {
            title: title.into(),
            description: String::new(),
            files,
        }
    }

    fn file(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            name: name.into(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_requires_admin_and_writes_nothing_otherwise() {
        let (_dir, service, store) = test_service(1024);

        let err = service
            .create_card(&AdminSession::anonymous(), draft("Launch", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Unauthorized));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let (_dir, service, _store) = test_service(1024);

        let err = service
            .create_card(&AdminSession::admin(), draft("   ", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Validation(_)));
    }

    #[tokio::test]
    async fn create_succeeds_and_round_trips() {
        let (_dir, service, _store) = test_service(1024);

        let created = service
            .create_card(
                &AdminSession::admin(),
                draft("Launch", vec![file("video.mp4", b"mp4-bytes")]),
            )
            .await
            .unwrap();
        assert_eq!(created.title, "Launch");
        assert_eq!(created.attachments.len(), 1);
        assert_eq!(created.attachments[0].ext, "mp4");

        let listed = service.list_cards().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn size_gate_rejects_before_any_write() {
        let (dir, service, store) = test_service(8);

        let err = service
            .create_card(
                &AdminSession::admin(),
                draft("Big", vec![file("clip.mp4", &[0u8; 64])]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::PayloadTooLarge));
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn file_type_gate_is_all_or_nothing() {
        let (dir, service, store) = test_service(1024);

        let err = service
            .create_card(
                &AdminSession::admin(),
                draft(
                    "Mixed",
                    vec![file("photo.jpg", b"jpg"), file("setup.exe", b"MZ")],
                ),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::UnsupportedFileType(_)));

        // Neither the valid nor the invalid file was written.
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn colliding_filenames_both_survive() {
        let (_dir, service, _store) = test_service(1024);

        let created = service
            .create_card(
                &AdminSession::admin(),
                draft(
                    "Photos",
                    vec![file("photo.jpg", b"one"), file("photo.jpg", b"two")],
                ),
            )
            .await
            .unwrap();

        let names: Vec<&str> = created
            .attachments
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["photo.jpg", "photo_2.jpg"]);
    }
}
