//! Model error type

use crate::types::EntityId;

/// Error type for parameter model operations
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Rack not found: {0}")]
    RackNotFound(EntityId),

    #[error("Module not found: {rack}/{module}")]
    ModuleNotFound { rack: EntityId, module: EntityId },

    #[error("Parameter not found: {module}/{param}")]
    ParamNotFound { module: EntityId, param: EntityId },

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Value {value} is not valid for parameter {param}")]
    InvalidValue { param: EntityId, value: String },

    #[error("Model state unavailable (lock poisoned)")]
    Unavailable,

    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
