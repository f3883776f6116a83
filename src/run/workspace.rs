//! Workspace management: checkout, fetched jars and written config files

use crate::error::{Error, Result};
use crate::run::process::{Invocation, ProcessRunner};
use crate::template::RenderedArtifact;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What `ensure_repository` did to bring the checkout up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositorySync {
    Cloned,
    Updated,
}

/// The working copy of the test repository and everything written into it
pub struct Workspace<'a, R: ProcessRunner> {
    /// Directory all relative workspace paths are resolved against
    pub root: PathBuf,
    git: String,
    gsutil: String,
    runner: &'a mut R,
}

impl<'a, R: ProcessRunner> Workspace<'a, R> {
    pub fn new(root: impl Into<PathBuf>, runner: &'a mut R) -> Self {
        Self {
            root: root.into(),
            git: "git".to_string(),
            gsutil: "gsutil".to_string(),
            runner,
        }
    }

    /// Override the version control and storage programs
    pub fn with_tools(mut self, git: impl Into<String>, gsutil: impl Into<String>) -> Self {
        self.git = git.into();
        self.gsutil = gsutil.into();
        self
    }

    /// Clone `url` into `local_path`, or pull if it is already there
    pub fn ensure_repository(&mut self, url: &str, local_path: &Path) -> Result<RepositorySync> {
        let (invocation, outcome) = if local_path.exists() {
            info!(path = %local_path.display(), "checkout exists; pulling");
            (
                Invocation::new(&self.git)
                    .arg("-C")
                    .arg(local_path)
                    .arg("pull"),
                RepositorySync::Updated,
            )
        } else {
            info!(url, path = %local_path.display(), "cloning");
            (
                Invocation::new(&self.git)
                    .arg("clone")
                    .arg(url)
                    .arg(local_path),
                RepositorySync::Cloned,
            )
        };

        self.run_sync(&invocation)?;
        Ok(outcome)
    }

    /// Fetch `name` from `remote_url` into `dest_dir` unless it is already there
    ///
    /// Returns whether a fetch happened. Only the presence of the file is
    /// checked, never its contents.
    pub fn ensure_dependency_artifact(
        &mut self,
        name: &str,
        remote_url: &str,
        dest_dir: &Path,
    ) -> Result<bool> {
        if Self::contains_file(dest_dir, name)? {
            debug!(name, dir = %dest_dir.display(), "dependency already present");
            return Ok(false);
        }

        info!(name, remote_url, "downloading dependency");
        fs::create_dir_all(dest_dir)?;
        let invocation = Invocation::new(&self.gsutil)
            .arg("cp")
            .arg(remote_url)
            .arg(dest_dir.join(name));
        self.run_sync(&invocation)?;
        Ok(true)
    }

    /// Copy a prebuilt `name` from `src_dir` into `dest_dir` unless it is already there
    ///
    /// Returns whether a copy happened. Same presence-only check as
    /// `ensure_dependency_artifact`; no process is spawned.
    pub fn ensure_local_artifact(&self, name: &str, src_dir: &Path, dest_dir: &Path) -> Result<bool> {
        if Self::contains_file(dest_dir, name)? {
            debug!(name, dir = %dest_dir.display(), "dependency already present");
            return Ok(false);
        }

        info!(name, src = %src_dir.display(), "copying prebuilt dependency");
        Self::copy_file(&src_dir.join(name), &dest_dir.join(name))?;
        Ok(true)
    }

    /// Copy a file over `dest`, replacing whatever is there
    pub fn copy_static_asset(&self, src: &Path, dest: &Path) -> Result<()> {
        Self::copy_file(src, &self.root.join(dest))
    }

    /// Write a rendered file into the workspace, replacing it atomically
    ///
    /// An existing target keeps its permissions; a new one is created 0644 on unix.
    pub fn write_artifact(&self, artifact: &RenderedArtifact) -> Result<PathBuf> {
        let dest = self.root.join(&artifact.target_path);
        let parent = dest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&parent)?;

        let mut file = NamedTempFile::new_in(&parent)?;
        if let Some(permissions) = artifact_permissions(&dest) {
            file.as_file().set_permissions(permissions)?;
        }
        file.write_all(artifact.content.as_bytes())?;
        file.persist(&dest)?;

        debug!(path = %dest.display(), bytes = artifact.content.len(), "wrote artifact");
        Ok(dest)
    }

    fn copy_file(src: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(src, dest).map_err(|e| {
            Error::Generic(format!(
                "Cannot copy '{}' to '{}': {}",
                src.display(),
                dest.display(),
                e
            ))
        })?;
        debug!(src = %src.display(), dest = %dest.display(), "copied file");
        Ok(())
    }

    fn contains_file(dir: &Path, name: &str) -> Result<bool> {
        if !dir.is_dir() {
            return Ok(false);
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_name().to_str() == Some(name) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn run_sync(&mut self, invocation: &Invocation) -> Result<()> {
        let code = self.runner.run(invocation)?;
        if code != 0 {
            warn!(command = %invocation, code, "sync command failed");
            return Err(Error::sync_error(invocation.to_string(), code));
        }
        Ok(())
    }
}

fn artifact_permissions(dest: &Path) -> Option<fs::Permissions> {
    match fs::metadata(dest) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Recorder {
        calls: Vec<Invocation>,
    }

    impl ProcessRunner for Recorder {
        fn run(&mut self, invocation: &Invocation) -> Result<i32> {
            self.calls.push(invocation.clone());
            Ok(0)
        }
    }

    #[test]
    fn test_write_artifact_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path(), &mut runner);

        let target = temp_dir.path().join("gradle/databases.gradle");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "old contents that are longer than the new ones").unwrap();

        let written = workspace
            .write_artifact(&RenderedArtifact {
                target_path: PathBuf::from("gradle/databases.gradle"),
                content: "new".to_string(),
            })
            .unwrap();

        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_copy_static_asset_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("hibernate.properties");
        fs::write(&src, "hibernate.show_sql=true").unwrap();

        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path().join("ws"), &mut runner);
        workspace
            .copy_static_asset(&src, Path::new("a/b/hibernate.properties"))
            .unwrap();
        workspace
            .copy_static_asset(&src, Path::new("a/b/hibernate.properties"))
            .unwrap();

        let copied = temp_dir.path().join("ws/a/b/hibernate.properties");
        assert_eq!(fs::read_to_string(copied).unwrap(), "hibernate.show_sql=true");
    }

    #[test]
    fn test_copy_missing_static_asset_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path(), &mut runner);

        let result = workspace.copy_static_asset(&temp_dir.path().join("missing"), Path::new("x"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_artifact_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path(), &mut runner);

        let fresh = workspace
            .write_artifact(&RenderedArtifact {
                target_path: PathBuf::from("gradle/databases.gradle"),
                content: "ext {}".to_string(),
            })
            .unwrap();
        let mode = fs::metadata(&fresh).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        let kept = temp_dir.path().join("documentation.gradle");
        fs::write(&kept, "old").unwrap();
        fs::set_permissions(&kept, fs::Permissions::from_mode(0o640)).unwrap();
        workspace
            .write_artifact(&RenderedArtifact {
                target_path: PathBuf::from("documentation.gradle"),
                content: "new".to_string(),
            })
            .unwrap();
        let mode = fs::metadata(&kept).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read_to_string(&kept).unwrap(), "new");
    }

    #[test]
    fn test_ensure_local_artifact_copies_once() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("knut-jdbc-shaded.jar"), "prebuilt").unwrap();
        let libs = temp_dir.path().join("ws/libs");

        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path().join("ws"), &mut runner);
        assert!(workspace
            .ensure_local_artifact("knut-jdbc-shaded.jar", &project, &libs)
            .unwrap());
        fs::write(project.join("knut-jdbc-shaded.jar"), "rebuilt").unwrap();
        assert!(!workspace
            .ensure_local_artifact("knut-jdbc-shaded.jar", &project, &libs)
            .unwrap());

        assert_eq!(
            fs::read_to_string(libs.join("knut-jdbc-shaded.jar")).unwrap(),
            "prebuilt"
        );
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_ensure_local_artifact_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut runner = Recorder { calls: Vec::new() };
        let workspace = Workspace::new(temp_dir.path(), &mut runner);

        let result = workspace.ensure_local_artifact(
            "knut-jdbc-shaded.jar",
            &temp_dir.path().join("nowhere"),
            &temp_dir.path().join("libs"),
        );
        assert!(result.is_err());
        assert!(!temp_dir.path().join("libs/knut-jdbc-shaded.jar").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_clone_passes_non_utf8_path_unchanged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let checkout = temp_dir
            .path()
            .join(OsStr::from_bytes(b"ws\xFF"))
            .join("hibernate-orm");

        let mut runner = Recorder { calls: Vec::new() };
        let mut workspace = Workspace::new(temp_dir.path(), &mut runner);
        let outcome = workspace
            .ensure_repository("https://example.com/orm.git", &checkout)
            .unwrap();
        drop(workspace);

        assert_eq!(outcome, RepositorySync::Cloned);
        assert_eq!(runner.calls.len(), 1);
        assert_eq!(Path::new(&runner.calls[0].args[2]), checkout.as_path());
    }
}
