use thiserror::Error;

#[derive(Error, Debug)]
pub enum OculoError {
    #[error("Invalid difficulty {difficulty} for {task}: expected a value below {range}")]
    InvalidDifficulty {
        task: &'static str,
        difficulty: u32,
        range: u32,
    },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown texture: {0}")]
    UnknownTexture(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OculoError>;
