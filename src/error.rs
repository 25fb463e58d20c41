use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagsyncError {
    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Release configuration error: {0}")]
    Config(String),

    #[error("Manifest parsing failed: {0}")]
    ManifestParsing(String),

    #[error("Command `{command}` failed: {message}")]
    CommandExecution { command: String, message: String },

    #[error("Git operation failed: {0}")]
    GitOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid dependency filter: {0}")]
    Filter(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, TagsyncError>;
