pub mod config;
pub mod error;
pub mod types;

pub use config::{CameraConfig, EnvConfig};
pub use error::{OculoError, Result};
pub use types::{Color, TaskRng, TextureId};
