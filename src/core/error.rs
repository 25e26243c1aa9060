use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulsoError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Empty corpus: no documents or no terms left after stopword filtering")]
    EmptyCorpus,

    #[error("Unknown zone: {0}")]
    UnknownZone(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PulsoError>;
