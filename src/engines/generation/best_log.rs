use crate::error::Result;
use crate::types::{BestLogEntry, EvaluationResult};
use log::info;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only text log of each generation's survivors.
pub struct BestLog {
    path: PathBuf,
}

impl BestLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, results: &[EvaluationResult]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        for result in results {
            let entry = BestLogEntry::from(result);
            info!("{}", entry);
            writeln!(file, "{}", entry)?;
        }
        file.flush()?;
        Ok(())
    }
}
