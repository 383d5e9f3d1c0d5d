use thiserror::Error;

/// Everything that can stop a curl command from becoming an apiDoc block.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("malformed curl command: {0}")]
    MalformedCommand(String),

    #[error("unrecognized options: {}", .0.join(", "))]
    UnrecognizedOption(Vec<String>),

    #[error("{what} is not valid JSON ({source}): {text}")]
    MalformedJson {
        what: &'static str,
        text: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DocError {
    pub fn malformed_command(msg: impl Into<String>) -> Self {
        Self::MalformedCommand(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
