//! HTTP protocol layer module
//!
//! JSON response builders shared by every route, decoupled from the notes logic.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_405_response, build_413_response, build_error_response, build_json_response,
    build_options_response,
};
