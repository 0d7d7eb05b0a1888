//! Core domain types for the Pinboard card board.
//!
//! A [`Card`] is the only user-visible record in the system: a title, a
//! description, and an ordered list of [`Attachment`] references. Cards are
//! created once and never edited or deleted.

mod card;

pub use card::{Attachment, Card, CardId};
