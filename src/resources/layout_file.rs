//! Layout file resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::fs::{backup_file, write_atomic};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A layout file that should hold exactly `content`.
///
/// Applying replaces the file atomically and keeps a timestamped copy of the
/// previous content next to it.
#[derive(Debug, Clone)]
pub struct LayoutFileResource {
    /// Destination path.
    pub path: PathBuf,
    /// Desired file content.
    pub content: String,
    /// Whether to back up the previous file before replacing it.
    pub backup: bool,
}

impl LayoutFileResource {
    /// Create a new layout file resource with backups enabled.
    #[must_use]
    pub const fn new(path: PathBuf, content: String) -> Self {
        Self {
            path,
            content,
            backup: true,
        }
    }

    /// Disable the backup of the previous file.
    #[must_use]
    pub const fn without_backup(mut self) -> Self {
        self.backup = false;
        self
    }
}

/// 1-based number of the first line where `current` and `desired` differ.
fn first_difference(current: &str, desired: &str) -> usize {
    let mut current_lines = current.lines();
    let mut desired_lines = desired.lines();
    let mut line = 1;
    loop {
        match (current_lines.next(), desired_lines.next()) {
            (Some(a), Some(b)) if a == b => line += 1,
            _ => return line,
        }
    }
}

impl Applicable for LayoutFileResource {
    fn description(&self) -> String {
        format!("layout file {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => return Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid { reason } => return Ok(ResourceChange::Skipped { reason }),
            ResourceState::Incorrect { .. } if self.backup => {
                backup_file(&self.path)?;
            }
            ResourceState::Missing | ResourceState::Incorrect { .. } => {}
        }
        write_atomic(&self.path, &self.content)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for LayoutFileResource {
    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "target is a directory".to_string(),
            });
        }
        if !self.path.exists() {
            return Ok(ResourceState::Missing);
        }
        let current = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        if current == self.content {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!(
                    "differs from line {}",
                    first_difference(&current, &self.content)
                ),
            })
        }
    }
}
