//! Request handler module
//!
//! Routes requests to the notes endpoints and turns their outcome into JSON responses.

pub mod notes;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
