//! Persistence for the Pinboard card board.
//!
//! Two storage areas back the board:
//!
//! - the card log, an append-only line-delimited JSON file holding one
//!   [`Card`](pinboard_core::Card) per line, abstracted behind the
//!   [`CardStore`] trait with a file-backed and an in-memory backend;
//! - the [`UploadStore`], a directory tree holding attachment bytes under
//!   one subdirectory per card.
//!
//! Neither area supports update or delete; cards are written exactly once.

mod error;
mod jsonl;
mod memory;
mod store;
mod uploads;

pub use error::StoreError;
pub use jsonl::JsonlCardStore;
pub use memory::MemoryCardStore;
pub use store::CardStore;
pub use uploads::{ALLOWED_EXTENSIONS, UploadStore, allowed_extension, sanitize_filename};
