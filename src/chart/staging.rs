//! Staging directories for chart output.
//!
//! A chart is written into a hidden sibling of its output directory and only
//! swapped into place once every file has been written, so a failed run never
//! leaves a half-written chart at the canonical path. A commit replaces only
//! the entries that were staged; other files in the output directory survive.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ChartError, Result};

/// A staging directory bound to its final output path.
#[derive(Debug)]
pub struct StagingDir {
    /// Directory being written.
    path: PathBuf,
    /// Where the directory lands on commit.
    target: PathBuf,
}

impl StagingDir {
    /// Creates a fresh staging directory next to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` has no directory name or the staging
    /// directory cannot be created.
    pub async fn create(target: &Path) -> Result<Self> {
        let target = std::path::absolute(target)?;
        let (Some(parent), Some(name)) = (target.parent(), target.file_name()) else {
            return Err(ChartError::InvalidOutput { path: target }.into());
        };

        let path = parent.join(format!(
            ".{}.staging-{}",
            name.to_string_lossy(),
            Uuid::new_v4().simple()
        ));
        fs::create_dir_all(&path)
            .await
            .map_err(|e| ChartError::write(&path, e))?;
        debug!("Created staging directory: {}", path.display());

        Ok(Self { path, target })
    }

    /// Returns the staging directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the final output directory.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Moves every staged entry into the target directory.
    ///
    /// Only the entries present in the staging directory are replaced.
    /// Anything else already in the target is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be created or an entry cannot
    /// be swapped in. Entries swapped so far are rolled back.
    pub async fn commit(self) -> Result<PathBuf> {
        let result = self.swap_entries().await;

        if let Err(e) = fs::remove_dir_all(&self.path).await {
            warn!("Failed to remove staging directory {}: {e}", self.path.display());
        }

        result?;
        debug!("Committed {}", self.target.display());
        Ok(self.target)
    }

    /// Removes the staging directory, leaving the target untouched.
    pub async fn discard(self) {
        if let Err(e) = fs::remove_dir_all(&self.path).await {
            warn!("Failed to remove staging directory {}: {e}", self.path.display());
        }
    }

    /// Directory holding target entries displaced during a commit.
    fn backup_path(&self) -> PathBuf {
        let mut backup = self.path.clone().into_os_string();
        backup.push(".previous");
        PathBuf::from(backup)
    }

    async fn swap_entries(&self) -> Result<()> {
        fs::create_dir_all(&self.target)
            .await
            .map_err(|e| ChartError::write(&self.target, e))?;

        let backup = self.backup_path();
        let mut swapped = Vec::new();

        for name in staged_entries(&self.path).await? {
            match self.swap_entry(&name, &backup).await {
                Ok(had_previous) => swapped.push((name, had_previous)),
                Err(e) => {
                    self.roll_back(&swapped, &backup).await;
                    return Err(e);
                }
            }
        }

        if fs::try_exists(&backup).await.unwrap_or(false)
            && let Err(e) = fs::remove_dir_all(&backup).await
        {
            warn!("Failed to remove previous output {}: {e}", backup.display());
        }
        Ok(())
    }

    /// Moves one staged entry into the target, setting any existing entry of
    /// the same name aside. Returns whether one was set aside.
    async fn swap_entry(&self, name: &OsStr, backup: &Path) -> Result<bool> {
        let current = self.target.join(name);
        let previous = backup.join(name);

        let had_previous = fs::try_exists(&current)
            .await
            .map_err(|e| ChartError::write(&current, e))?;
        if had_previous {
            fs::create_dir_all(backup)
                .await
                .map_err(|e| ChartError::write(backup, e))?;
            fs::rename(&current, &previous)
                .await
                .map_err(|e| ChartError::write(&current, e))?;
        }

        if let Err(e) = fs::rename(self.path.join(name), &current).await {
            if had_previous {
                restore(&previous, &current).await;
            }
            return Err(ChartError::write(&current, e).into());
        }
        Ok(had_previous)
    }

    async fn roll_back(&self, swapped: &[(OsString, bool)], backup: &Path) {
        for (name, had_previous) in swapped.iter().rev() {
            let current = self.target.join(name);
            if let Err(e) = remove_path(&current).await {
                warn!("Failed to remove partial output {}: {e}", current.display());
            }
            if *had_previous {
                restore(&backup.join(name), &current).await;
            }
        }
    }
}

/// Lists the top-level entries of a staging directory, sorted.
async fn staged_entries(dir: &Path) -> Result<Vec<OsString>> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ChartError::write(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ChartError::write(dir, e))?
    {
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}

/// Puts a displaced entry back where it was.
async fn restore(previous: &Path, current: &Path) {
    if let Err(e) = fs::rename(previous, current).await {
        warn!(
            "Failed to restore previous output {} to {}: {e}",
            previous.display(),
            current.display()
        );
    }
}

/// Removes a file or directory tree.
async fn remove_path(path: &Path) -> std::io::Result<()> {
    if fs::metadata(path).await?.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    }
}

/// Writes `contents` to `path` through a temporary file and a rename.
///
/// # Errors
///
/// Returns [`ChartError::WriteFailed`] if any step fails.
pub async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path)
        .await
        .map_err(|e| ChartError::write(path, e))?;
    file.write_all(contents)
        .await
        .map_err(|e| ChartError::write(path, e))?;
    file.sync_all()
        .await
        .map_err(|e| ChartError::write(path, e))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| ChartError::write(path, e))?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// Serializes `value` as YAML and writes it to `path`.
///
/// Returns the bytes written.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_yaml<T: serde::Serialize>(path: &Path, value: &T) -> Result<String> {
    let content = serde_yaml::to_string(value)
        .map_err(|e| ChartError::serialization(format!("{}: {e}", path.display())))?;
    write_file(path, content.as_bytes()).await?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_commit_into_fresh_target() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("orders");

        let staging = StagingDir::create(&target).await.expect("staging");
        write_file(&staging.path().join("Chart.yaml"), b"name: orders\n")
            .await
            .expect("write");
        staging.commit().await.expect("commit");

        let content = std::fs::read_to_string(target.join("Chart.yaml")).expect("committed");
        assert_eq!(content, "name: orders\n");
    }

    #[tokio::test]
    async fn test_commit_replaces_staged_entries() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("orders");
        std::fs::create_dir_all(target.join("templates")).expect("old output");
        std::fs::write(target.join("templates/ingress.yaml"), "stale\n").expect("old file");
        std::fs::write(target.join("values.yaml"), "replicas: 3\n").expect("old values");

        let staging = StagingDir::create(&target).await.expect("staging");
        std::fs::create_dir_all(staging.path().join("templates")).expect("staged templates");
        write_file(&staging.path().join("templates/service.yaml"), b"svc\n")
            .await
            .expect("write");
        write_file(&staging.path().join("values.yaml"), b"replicas: 1\n")
            .await
            .expect("write");
        staging.commit().await.expect("commit");

        assert_eq!(
            std::fs::read_to_string(target.join("values.yaml")).expect("values"),
            "replicas: 1\n"
        );
        assert!(target.join("templates/service.yaml").exists());
        assert!(!target.join("templates/ingress.yaml").exists());

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .expect("readable")
            .filter_map(std::result::Result::ok)
            .map(|e| e.file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_keeps_unstaged_files() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("orders");
        std::fs::create_dir_all(target.join("docs")).expect("old output");
        std::fs::write(target.join("README.md"), "# orders\n").expect("readme");
        std::fs::write(target.join("configuration.yml"), "service: {}\n").expect("config");
        std::fs::write(target.join("docs/notes.md"), "notes\n").expect("notes");

        let staging = StagingDir::create(&target).await.expect("staging");
        write_file(&staging.path().join("Chart.yaml"), b"name: orders\n")
            .await
            .expect("write");
        staging.commit().await.expect("commit");

        assert!(target.join("Chart.yaml").exists());
        assert_eq!(
            std::fs::read_to_string(target.join("README.md")).expect("readme kept"),
            "# orders\n"
        );
        assert!(target.join("configuration.yml").exists());
        assert!(target.join("docs/notes.md").exists());
    }

    #[tokio::test]
    async fn test_restore_puts_entry_back() {
        let temp = TempDir::new().expect("temp dir");
        let previous = temp.path().join("backup/Chart.yaml");
        let current = temp.path().join("Chart.yaml");
        std::fs::create_dir_all(temp.path().join("backup")).expect("backup dir");
        std::fs::write(&previous, "old\n").expect("backup file");

        restore(&previous, &current).await;
        assert_eq!(std::fs::read_to_string(&current).expect("restored"), "old\n");

        // A missing backup only logs.
        restore(&previous, &current).await;
        assert!(current.exists());
    }

    #[tokio::test]
    async fn test_discard_keeps_target() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("orders");
        std::fs::create_dir_all(&target).expect("old output");
        std::fs::write(target.join("Chart.yaml"), "old\n").expect("old file");

        let staging = StagingDir::create(&target).await.expect("staging");
        let staged = staging.path().to_path_buf();
        staging.discard().await;

        assert!(!staged.exists());
        assert_eq!(
            std::fs::read_to_string(target.join("Chart.yaml")).expect("kept"),
            "old\n"
        );
    }
}
