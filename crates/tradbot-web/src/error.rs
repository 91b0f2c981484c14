use thiserror::Error;

/// Errors raised while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WebError>;
