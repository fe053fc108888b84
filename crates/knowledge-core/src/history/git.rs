use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{Commit, Oid, Repository};

use super::ChangeHistory;
use crate::error::CoreError;

/// Answers "when did this path last change" by walking commits from HEAD.
pub struct GitHistory {
    repo: Repository,
    /// Location of the project root inside the repository work tree.
    prefix: PathBuf,
}

impl GitHistory {
    /// Open the repository whose work tree root is `path`.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let repo = Repository::open(path)?;
        Ok(Self {
            repo,
            prefix: PathBuf::new(),
        })
    }

    /// Discover the repository containing `project_root`, which may be a
    /// subdirectory of the work tree.
    pub fn discover(project_root: &Path) -> Result<Self, CoreError> {
        let repo = Repository::discover(project_root)?;
        let prefix = repo
            .workdir()
            .and_then(|workdir| {
                let workdir = workdir.canonicalize().ok()?;
                let root = project_root.canonicalize().ok()?;
                root.strip_prefix(&workdir).ok().map(Path::to_path_buf)
            })
            .unwrap_or_default();
        Ok(Self { repo, prefix })
    }

    /// Newest commit that changed `path`, following history the way
    /// `git log -- <path>` simplifies it: a merge whose entry matches one of
    /// its parents is not a change and only that parent is followed.
    fn find_last_change(&self, path: &Path) -> Result<Option<DateTime<FixedOffset>>, git2::Error> {
        let mut commit = self.repo.head()?.peel_to_commit()?;
        loop {
            let current = entry_at(&commit, path)?;
            if commit.parent_count() == 0 {
                return Ok(current.and_then(|_| to_datetime(commit.author().when())));
            }

            let mut unchanged_in = None;
            for parent in commit.parents() {
                if entry_at(&parent, path)? == current {
                    unchanged_in = Some(parent);
                    break;
                }
            }
            match unchanged_in {
                Some(parent) => commit = parent,
                None => return Ok(to_datetime(commit.author().when())),
            }
        }
    }

    /// `path` inside the repository, or `None` when it is absolute or climbs
    /// out of the work tree.
    fn repo_path(&self, path: &str) -> Option<PathBuf> {
        let mut full = self.prefix.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => full.push(part),
                Component::ParentDir => {
                    if !full.pop() {
                        return None;
                    }
                }
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(full)
    }
}

impl ChangeHistory for GitHistory {
    fn last_change(&self, path: &str) -> Option<DateTime<FixedOffset>> {
        let Some(repo_path) = self.repo_path(path) else {
            tracing::debug!(path, "Path is outside the work tree");
            return None;
        };
        match self.find_last_change(&repo_path) {
            Ok(found) => {
                if found.is_none() {
                    tracing::debug!(path, "Path has no Git history");
                }
                found
            }
            Err(e) => {
                tracing::debug!(path, "Git history lookup failed: {e}");
                None
            }
        }
    }
}

/// Object id at `path` in the commit's tree; the root tree for an empty path.
fn entry_at(commit: &Commit<'_>, path: &Path) -> Result<Option<Oid>, git2::Error> {
    if path.as_os_str().is_empty() {
        return Ok(Some(commit.tree_id()));
    }
    Ok(commit.tree()?.get_path(path).ok().map(|entry| entry.id()))
}

fn to_datetime(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    offset.timestamp_opt(time.seconds(), 0).single()
}
