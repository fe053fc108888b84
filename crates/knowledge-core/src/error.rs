use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error(".knowledge/ not found. Run 'knowledge-system init' first.")]
    NotInitialized,

    #[error(".knowledge/config.yaml not found.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
