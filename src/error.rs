/// Errors produced while building scenes and writing frames.
///
/// Ray misses are not errors; they fall back to the background color.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A zero-length (or non-finite) vector was normalized.
    #[error("cannot normalize a degenerate vector")]
    DegenerateVector,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    /// The scene description parsed, but holds values the tracer can't use.
    #[error("invalid scene: {0}")]
    InvalidScene(String),
}
