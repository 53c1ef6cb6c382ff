use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("error rendering template: {0}")]
    Template(#[from] tera::Error),

    #[error("error parsing configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{} doesn't exist", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to start `{tool}`: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` exited unsuccessfully with status {code:?}")]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("could not read report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SvsError>;
