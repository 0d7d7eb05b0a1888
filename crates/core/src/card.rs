use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a [`Card`].
///
/// Ten lowercase hex characters taken from a UUIDv4. Short enough to appear
/// in attachment URLs, long enough that collisions are not a practical
/// concern for a single board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CardId(String);

impl CardId {
    /// Length of a generated id.
    const GENERATED_LEN: usize = 10;

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::GENERATED_LEN].to_owned())
    }

    /// Wrap an existing id without validation (e.g. when deserializing a
    /// stored record).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse an untrusted id (e.g. a URL path segment).
    ///
    /// Accepts 8 to 32 lowercase hex characters; anything else is rejected
    /// so ids can be used directly as directory names.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let valid = (8..=32).contains(&value.len())
            && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(value.to_owned()))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored attachment reference.
///
/// Only the filename (relative to the card's upload directory) and the
/// lowercase extension are persisted; the download URL is derived from the
/// card id and filename at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Attachment {
    /// Stored filename within the card's upload directory.
    pub name: String,
    /// Lowercase file extension (e.g. `"mp4"`, `"pdf"`).
    pub ext: String,
}

impl Attachment {
    /// Build an attachment reference from a stored filename, deriving the
    /// extension from the final dot segment.
    #[must_use]
    pub fn from_stored_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        Self { name, ext }
    }
}

/// A published card: the unit of content on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Card {
    /// Unique card identifier, immutable after creation.
    pub id: CardId,

    /// Card title. Always non-empty.
    pub title: String,

    /// Free-form description, may be empty.
    #[serde(default)]
    pub description: String,

    /// Ordered attachment references, one per uploaded file.
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Creation timestamp, immutable after creation.
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card with a generated id and `created_at` set to now.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            id: CardId::generate(),
            title: title.into(),
            description: description.into(),
            attachments,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_lowercase_hex() {
        let id = CardId::generate();
        assert_eq!(id.as_str().len(), 10);
        assert!(CardId::parse(id.as_str()).is_some());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: std::collections::HashSet<String> = (0..100)
            .map(|_| CardId::generate().as_str().to_owned())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn parse_rejects_unsafe_ids() {
        assert!(CardId::parse("deadbeef42").is_some());
        assert!(CardId::parse("").is_none());
        assert!(CardId::parse("short").is_none());
        assert!(CardId::parse("DEADBEEF42").is_none());
        assert!(CardId::parse("../../etc/passwd").is_none());
        assert!(CardId::parse(&"a".repeat(33)).is_none());
    }

    #[test]
    fn attachment_derives_extension() {
        let a = Attachment::from_stored_name("clip.MP4");
        assert_eq!(a.name, "clip.MP4");
        assert_eq!(a.ext, "mp4");

        let b = Attachment::from_stored_name("noext");
        assert_eq!(b.ext, "");
    }

    #[test]
    fn card_serde_roundtrip() {
        let card = Card::new(
            "Launch",
            "v1",
            vec![Attachment::from_stored_name("video.mp4")],
        );
        let line = serde_json::to_string(&card).unwrap();
        assert!(!line.contains('\n'));
        let back: Card = serde_json::from_str(&line).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn card_deserializes_without_optional_fields() {
        let json = r#"{"id":"deadbeef42","title":"Hello","created_at":"2025-01-01T00:00:00Z"}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.title, "Hello");
        assert!(card.description.is_empty());
        assert!(card.attachments.is_empty());
    }
}
