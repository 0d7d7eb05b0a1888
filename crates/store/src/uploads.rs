use std::path::{Path, PathBuf};

use pinboard_core::CardId;

use crate::error::StoreError;

/// File extensions accepted for attachments, lowercase.
///
/// Images and videos render inline on clients; documents and archives are
/// download-only. Anything else is rejected outright.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "webp",
    // videos
    "mp4", "webm", "mov",
    // documents / archives
    "pdf", "txt", "csv", "zip", "7z", "rar",
    "doc", "docx", "xls", "xlsx", "ppt", "pptx",
];

/// Whether a filename carries an allow-listed extension.
///
/// A filename without any extension is not allowed.
#[must_use]
pub fn allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Sanitize a client-supplied filename for storage.
///
/// Strips directory components (both separator styles), maps every character
/// outside `[A-Za-z0-9._-]` to `_`, and drops leading dots so the result can
/// never be a hidden file or a relative path. Returns `None` when nothing
/// usable remains.
#[must_use]
pub fn sanitize_filename(original: &str) -> Option<String> {
    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_owned();
    if cleaned.is_empty() || cleaned.chars().all(|c| matches!(c, '.' | '_' | '-')) {
        return None;
    }
    Some(cleaned)
}

/// Filesystem area holding attachment bytes, one directory per card.
///
/// Layout: `<root>/<card_id>/<filename>`, flat filenames inside. Stored
/// filenames are always sanitized, so every entry is a plain file directly
/// under its card directory.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`. Directories are created on demand.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the upload area.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a card's attachments.
    #[must_use]
    pub fn card_dir(&self, card_id: &CardId) -> PathBuf {
        self.root.join(card_id.as_str())
    }

    /// Resolve a stored attachment path for serving.
    ///
    /// The filename is re-sanitized and must come back unchanged; anything
    /// else (traversal attempts, mangled names) yields `None`.
    #[must_use]
    pub fn resolve(&self, card_id: &CardId, filename: &str) -> Option<PathBuf> {
        let safe = sanitize_filename(filename)?;
        if safe != filename {
            return None;
        }
        Some(self.card_dir(card_id).join(safe))
    }

    /// Persist one attachment under the card's directory.
    ///
    /// Validates the extension against [`ALLOWED_EXTENSIONS`], sanitizes the
    /// original filename, and resolves collisions with an existing file by
    /// suffixing `_2`, `_3`, ... before the extension. Returns the stored
    /// filename.
    pub async fn save(
        &self,
        card_id: &CardId,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, StoreError> {
        let filename = sanitize_filename(original_name).ok_or_else(|| {
            StoreError::InvalidFilename {
                original: original_name.to_owned(),
            }
        })?;
        if !allowed_extension(&filename) {
            return Err(StoreError::UnsupportedFileType {
                filename: original_name.to_owned(),
            });
        }

        let dir = self.card_dir(card_id);
        tokio::fs::create_dir_all(&dir).await?;

        let stored = unique_filename(&dir, &filename).await?;
        tokio::fs::write(dir.join(&stored), bytes).await?;
        Ok(stored)
    }
}

/// Find a filename not yet present in `dir`, starting from `filename` and
/// suffixing `_2`, `_3`, ... before the extension on collision.
async fn unique_filename(dir: &Path, filename: &str) -> Result<String, StoreError> {
    if !tokio::fs::try_exists(dir.join(filename)).await? {
        return Ok(filename.to_owned());
    }

    let (base, ext) = match filename.rsplit_once('.') {
        Some((base, ext)) => (base, Some(ext)),
        None => (filename, None),
    };

    let mut i = 2u32;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{base}_{i}.{ext}"),
            None => format!("{base}_{i}"),
        };
        if !tokio::fs::try_exists(dir.join(&candidate)).await? {
            return Ok(candidate);
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, UploadStore, CardId) {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        (dir, store, CardId::generate())
    }

    #[test]
    fn allow_list_membership() {
        assert!(allowed_extension("video.mp4"));
        assert!(allowed_extension("photo.JPG"));
        assert!(allowed_extension("report.pdf"));
        assert!(!allowed_extension("malware.exe"));
        assert!(!allowed_extension("noextension"));
    }

    #[test]
    fn sanitization_strips_directories_and_unsafe_characters() {
        assert_eq!(
            sanitize_filename("../../etc/passwd.txt").as_deref(),
            Some("passwd.txt")
        );
        assert_eq!(
            sanitize_filename("C:\\Users\\admin\\photo.jpg").as_deref(),
            Some("photo.jpg")
        );
        assert_eq!(
            sanitize_filename("my report (final).pdf").as_deref(),
            Some("my_report__final_.pdf")
        );
        assert_eq!(sanitize_filename(".hidden.png").as_deref(), Some("hidden.png"));
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("///"), None);
    }

    #[tokio::test]
    async fn saves_bytes_under_card_directory() {
        let (_dir, store, card_id) = temp_store();

        let stored = store.save(&card_id, "video.mp4", b"abc").await.unwrap();
        assert_eq!(stored, "video.mp4");

        let on_disk = std::fs::read(store.card_dir(&card_id).join(&stored)).unwrap();
        assert_eq!(on_disk, b"abc");
    }

    #[tokio::test]
    async fn rejects_disallowed_extension_without_writing() {
        let (_dir, store, card_id) = temp_store();

        let err = store.save(&card_id, "setup.exe", b"MZ").await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedFileType { .. }));
        // The card directory may exist only if something was written.
        assert!(!store.card_dir(&card_id).exists());
    }

    #[tokio::test]
    async fn collisions_get_disambiguating_suffixes() {
        let (_dir, store, card_id) = temp_store();

        let first = store.save(&card_id, "photo.jpg", b"one").await.unwrap();
        let second = store.save(&card_id, "photo.jpg", b"two").await.unwrap();
        let third = store.save(&card_id, "photo.jpg", b"three").await.unwrap();

        assert_eq!(first, "photo.jpg");
        assert_eq!(second, "photo_2.jpg");
        assert_eq!(third, "photo_3.jpg");

        let dir = store.card_dir(&card_id);
        assert_eq!(std::fs::read(dir.join(&second)).unwrap(), b"two");
        assert_eq!(std::fs::read(dir.join(&third)).unwrap(), b"three");
    }

    #[tokio::test]
    async fn resolve_refuses_traversal() {
        let (_dir, store, card_id) = temp_store();

        assert!(store.resolve(&card_id, "photo.jpg").is_some());
        assert!(store.resolve(&card_id, "../secret.txt").is_none());
        assert!(store.resolve(&card_id, ".env").is_none());
    }
}
