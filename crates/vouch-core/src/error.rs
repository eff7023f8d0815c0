/// Core errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown verifier type: {0}")]
    UnknownKind(String),

    #[error("missing required setting: {0}")]
    MissingSetting(String),

    #[error("invalid value for setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}
