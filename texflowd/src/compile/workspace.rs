//! Per-request build workspaces.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// An isolated, uniquely named directory owned by a single compile request.
///
/// Holds the entry-point source, any materialized assets, and everything the
/// toolchain produces. The whole tree is removed when the handle is dropped,
/// whatever the request's outcome. Removal is best-effort: a failed cleanup
/// is logged and swallowed, never surfaced, since it runs after the outcome
/// is already determined.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Create a fresh workspace under `root`, named by a random v4 UUID.
    pub async fn create(root: &Path) -> std::io::Result<Workspace> {
        let path = root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&path).await?;
        Ok(Workspace { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of `name` inside the workspace.
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), "workspace cleanup failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drop_removes_directory_and_contents() {
        let root = tempfile::tempdir().unwrap();
        let path;
        {
            let ws = Workspace::create(root.path()).await.unwrap();
            path = ws.path().to_path_buf();
            assert!(path.is_dir());
            tokio::fs::write(ws.join("main.tex"), "x").await.unwrap();
            tokio::fs::create_dir_all(ws.join("figs")).await.unwrap();
        }
        assert!(!path.exists());
        assert!(root.path().exists());
    }

    #[tokio::test]
    async fn workspaces_are_never_reused() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::create(root.path()).await.unwrap();
        let b = Workspace::create(root.path()).await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
