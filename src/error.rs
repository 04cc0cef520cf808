use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Operands must be instances of Value, got {found}")]
    InvalidOperand { found: &'static str },

    #[error("failed to start graph renderer '{}': {source}", program.display())]
    RenderSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("graph renderer '{}' exited with {status}: {stderr}", program.display())]
    RenderFailed {
        program: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
