use chamber_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid member data: {0}")]
    Data(#[from] serde_json::Error),

    #[error("member not found: {0}")]
    NotFound(String),

    #[error("unknown criteria field: '{0}' (expected category, tier, query or sort)")]
    UnknownField(String),

    #[error("invalid application: {}", .0.join("; "))]
    InvalidApplication(Vec<String>),

    #[error("http server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("live directory has shut down")]
    LiveClosed,
}
