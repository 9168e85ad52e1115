use thiserror::Error;

/// Configuration failures, raised before any layout work starts
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("unknown media '{0}'. Supported: note, label1, label2, label3, label4, label0.5")]
    UnknownMedia(String),

    #[error("unknown sticky edge '{0}'. Supported: up, down, left, right")]
    UnknownStickyEdge(String),

    #[error("font '{0}' is not registered and was not found in any font directory")]
    UnregisteredFont(String),
}
