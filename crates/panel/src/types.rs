//! Panel API wire types.

use serde::{Deserialize, Serialize};

/// `{ "object": "list", "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

/// `{ "object": "...", "attributes": {...} }` envelope.
#[derive(Debug, Deserialize)]
pub struct ObjectResponse<T> {
    pub attributes: T,
}

/// A file or directory entry returned by the files API.
#[derive(Debug, Clone, Deserialize)]
pub struct FileObject {
    pub name: String,
}

/// Body for `files/compress` and `files/delete`.
#[derive(Debug, Serialize)]
pub struct FilesRequest<'a> {
    pub root: &'a str,
    pub files: &'a [String],
}

/// Body for `power`.
#[derive(Debug, Serialize)]
pub struct PowerRequest {
    pub signal: crate::PowerSignal,
}
