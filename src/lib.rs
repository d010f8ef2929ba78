//! Read-only JSON notes server.
//!
//! `GET /api/files` lists the `.json` files of the notes directory and
//! `GET /api/files/{path}` returns one of them parsed. Paths resolve against a
//! configured base directory and may not leave it.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod notes;
pub mod server;
