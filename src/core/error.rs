use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
