use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use pinboard_core::Card;

use crate::error::StoreError;
use crate::store::CardStore;

/// Name of the card log file inside the data directory.
const CARD_LOG_FILE: &str = "cards.jsonl";

/// File-backed [`CardStore`]: one JSON-encoded card per line, append-only.
///
/// The file grows monotonically; there is no compaction. Appends within this
/// process are serialized by an internal mutex so interleaved writes cannot
/// split a line. Concurrent appends from *other* processes are not
/// coordinated; this store assumes a single-process deployment.
pub struct JsonlCardStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl JsonlCardStore {
    /// Create a store writing to `<data_dir>/cards.jsonl`.
    ///
    /// The file itself is created lazily on first append.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(CARD_LOG_FILE),
            append_lock: Mutex::new(()),
        }
    }

    /// Path of the underlying log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CardStore for JsonlCardStore {
    async fn append(&self, card: &Card) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(card)?;
        line.push('\n');

        let _guard = self.append_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Card>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut cards = Vec::new();
        for (lineno, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Card>(line) {
                Ok(card) => cards.push(card),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = lineno + 1,
                        error = %e,
                        "skipping malformed card record"
                    );
                }
            }
        }
        Ok(cards)
    }
}
