//! Notes module
//!
//! Read-only view over the note files below the configured base directory:
//! listing the notes directory and loading single JSON files.

mod entry;
mod error;
mod store;

pub use entry::{Entry, EntryKind};
pub use error::NotesError;
pub use store::NotesStore;
