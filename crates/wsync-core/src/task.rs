use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// The synchronization tasks exposed on the command line. Each one is a
/// standalone, idempotent pass over the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Write every package manifest, ensure append targets, patch the
    /// foreign descriptor.
    Setup,
    /// Regenerate one package's barrel file.
    Barrels,
    /// Rewrite model imports in the stub package to type-only form.
    FixImports,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Barrels => "barrels",
            Self::FixImports => "fix-imports",
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TaskParseError {
    #[error("unknown task '{0}' (supported: setup, barrels, fix-imports)")]
    UnknownTask(String),
}

impl FromStr for Task {
    type Err = TaskParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "setup" => Ok(Self::Setup),
            "barrels" => Ok(Self::Barrels),
            "fix-imports" => Ok(Self::FixImports),
            other => Err(TaskParseError::UnknownTask(other.to_string())),
        }
    }
}
