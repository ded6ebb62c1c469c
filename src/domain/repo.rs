use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub name: String,
    #[serde(default)]
    pub relative_path: String,
    pub repo: String,
}

impl RepoDescriptor {
    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_path).join(&self.repo)
    }

    /// Parses `name=relative/path/dir`; the last path segment is the repo directory.
    pub fn parse(entry: &str) -> Option<Self> {
        let (name, location) = entry.split_once('=')?;
        let name = name.trim();
        let location = location.trim().trim_end_matches(['/', '\\']);
        if name.is_empty() || location.is_empty() {
            return None;
        }
        let (relative_path, repo) = match location.rsplit_once(['/', '\\']) {
            Some((parent, dir)) => (parent.to_string(), dir.to_string()),
            None => (String::new(), location.to_string()),
        };
        if repo.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            relative_path,
            repo,
        })
    }
}

pub fn find_repo<'a>(repos: &'a [RepoDescriptor], name: &str) -> Option<&'a RepoDescriptor> {
    repos.iter().find(|repo| repo.name == name)
}
