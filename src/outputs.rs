//! Step outputs for the calling workflow.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::modes::ActionOutcome;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write step output: {0}")]
    Io(#[from] io::Error),
}

/// Appends `name=value` lines to the `GITHUB_OUTPUT` file.
///
/// Without a file the values are only logged.
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    path: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn new(path: Option<PathBuf>) -> Self {
        ActionOutputs { path }
    }

    /// Outputs for the file named by `GITHUB_OUTPUT`, for when the command
    /// line could not be parsed.
    pub fn from_env() -> Self {
        Self::new(output_path(std::env::var_os("GITHUB_OUTPUT")))
    }

    pub fn set(&self, name: &str, value: &str) -> Result<(), OutputError> {
        info!(name, value, "step output");
        if let Some(path) = &self.path {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "{name}={value}")?;
        }
        Ok(())
    }

    pub fn write_outcome(&self, outcome: &ActionOutcome) -> Result<(), OutputError> {
        for (name, value) in outcome.outputs() {
            self.set(name, &value)?;
        }
        Ok(())
    }
}

fn output_path(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ActionStatus;
    use crate::types::IssueNumber;

    #[test]
    fn appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        let outputs = ActionOutputs::new(Some(path.clone()));
        let outcome = ActionOutcome::new(ActionStatus::Cancelled).with_next_issue(Some(IssueNumber(7)));
        outputs.write_outcome(&outcome).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "earlier=1\nstatus=CANCELLED\nnext_pr=7\n");
    }

    #[test]
    fn creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh");

        ActionOutputs::new(Some(path.clone()))
            .set("status", "FAILED")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "status=FAILED\n");
    }

    #[test]
    fn empty_output_variable_means_no_file() {
        assert_eq!(output_path(None), None);
        assert_eq!(output_path(Some(OsString::new())), None);
        assert_eq!(
            output_path(Some(OsString::from("/tmp/out"))),
            Some(PathBuf::from("/tmp/out"))
        );
    }

    #[test]
    fn without_a_file_nothing_is_written() {
        let outcome = ActionOutcome::new(ActionStatus::Completed);
        assert!(ActionOutputs::default().write_outcome(&outcome).is_ok());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let outputs = ActionOutputs::new(Some(dir.path().to_path_buf()));
        assert!(matches!(
            outputs.set("status", "FAILED"),
            Err(OutputError::Io(_))
        ));
    }
}
