//! Notes endpoints
//!
//! `GET /api/files` lists the notes directory, `GET /api/files/{path}` returns
//! one parsed JSON file. Every failure becomes a `{"error": ...}` body here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;

/// Serve the notes directory listing
pub async fn list_files(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let http_cfg = &state.config.http;
    match state.notes.list().await {
        Ok(tree) => http::build_json_response(StatusCode::OK, &tree, http_cfg, ctx.is_head),
        Err(e) if e.is_not_found() => {
            logger::log_debug(&format!(
                "Notes directory missing: {}",
                state.notes.notes_path().display()
            ));
            http::build_error_response(
                StatusCode::NOT_FOUND,
                "directory not found",
                http_cfg,
                ctx.is_head,
            )
        }
        Err(e) => {
            logger::log_error(&format!("Listing notes directory failed: {e}"));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to retrieve file structure: {e}"),
                http_cfg,
                ctx.is_head,
            )
        }
    }
}

/// Serve one JSON file; `raw_path` is still percent-encoded
pub async fn file_content(
    ctx: &RequestContext<'_>,
    raw_path: &str,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let http_cfg = &state.config.http;
    let not_found =
        || http::build_error_response(StatusCode::NOT_FOUND, "file not found", http_cfg, ctx.is_head);

    let Ok(relative) = percent_decode_str(raw_path).decode_utf8() else {
        logger::log_debug(&format!("Undecodable file path: {raw_path}"));
        return not_found();
    };

    match state.notes.read(&relative).await {
        Ok(content) => http::build_json_response(StatusCode::OK, &content, http_cfg, ctx.is_head),
        Err(e) if e.is_not_found() => not_found(),
        Err(e) => {
            logger::log_error(&format!("Reading note '{relative}' failed: {e}"));
            http::build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to retrieve file content: {e}"),
                http_cfg,
                ctx.is_head,
            )
        }
    }
}
