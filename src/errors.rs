use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("definition error: {0}")]
    Definition(String),

    #[error("construction error: creator returned no node for segment '{segment}' of path '{path}'")]
    Construction { path: String, segment: String },

    #[error("construction error: empty node path")]
    EmptyPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selection pattern: {0}")]
    Selection(#[from] regex::Error),
}
