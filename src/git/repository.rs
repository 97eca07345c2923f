//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository, Tree};
use tracing::debug;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    #[cfg(test)]
    pub(crate) fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Find the repository containing `path`, searching parent directories
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Get access to the underlying git2::Repository
    #[cfg(test)]
    pub(crate) fn repository(&self) -> &Repository {
        &self.repo
    }

    /// List files staged in the index, relative to the work tree.
    ///
    /// Equivalent to `git diff --cached --name-only`: the index is compared
    /// against the `HEAD` tree, or against nothing on an unborn branch.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        let index = self.repo.index().context("Failed to read git index")?;
        let head_tree = self.head_tree()?;

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .context("Failed to diff HEAD against the index")?;

        let mut files: Vec<String> = Vec::new();
        for delta in diff.deltas() {
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if let Some(path) = path {
                let file = path.to_string_lossy().replace('\\', "/");
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }

        debug!(count = files.len(), ?files, "Listed staged files");
        Ok(files)
    }

    fn head_tree(&self) -> Result<Option<Tree<'_>>> {
        match self.repo.head() {
            Ok(head) => {
                let tree = head.peel_to_tree().context("Failed to resolve HEAD tree")?;
                Ok(Some(tree))
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, diffing index against an empty tree");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to get HEAD reference"),
        }
    }
}
