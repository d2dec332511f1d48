// src/model.rs

use std::collections::HashMap;
use std::fmt;

/// Identifies a single historical commit. Opaque; only string equality
/// matters. The short prefix is for display, never for lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitId(pub String);

impl CommitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display prefix, like the first column of `git log --oneline`.
    pub fn short(&self) -> &str {
        let end = self.0.len().min(10);
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lexically sortable commit timestamp: `YYYY-MM-DDTHH:MM:SS+HHMM`,
/// local time plus UTC offset as recorded in the commit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CommitStamp(pub String);

/// One inserted line resolved to the commit that last touched it.
/// Field order gives the `Ord` the replay plan needs: stamp first,
/// commit id as the deterministic tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Attribution {
    pub stamp: CommitStamp,
    pub id: CommitId,
}

/// The deduplicated commits behind a branch, oldest first. This is the
/// exact sequence handed to cherry-pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayPlan {
    pub commits: Vec<CommitId>,
}

/// A file path together with every branch commit that touched it, in
/// the order the commits were processed.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub path: String,
    pub commits: Vec<CommitId>,
}

/// Reporter output: paths touched by more than one commit, in discovery
/// order, plus first-line summaries for display.
#[derive(Debug, Clone, Default)]
pub struct PathCommitIndex {
    pub entries: Vec<PathEntry>,
    pub summaries: HashMap<CommitId, String>,
}

impl PathCommitIndex {
    pub fn summary(&self, id: &CommitId) -> &str {
        self.summaries.get(id).map_or("", |s| s.as_str())
    }
}
