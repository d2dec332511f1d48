// src/vcs.rs

use std::path::Path;

use chrono::{FixedOffset, TimeZone};
use thiserror::Error;

use crate::model::{CommitId, CommitStamp};

#[derive(Debug, Error)]
pub enum Error {
    /// The version-control backend reported failure: non-zero status,
    /// unreachable revision, or file/line not found at a revision.
    #[error("vcs query failed: {0}")]
    VcsQuery(String),
    /// A blame result could not be turned into a structured attribution.
    /// Never guessed or defaulted; always fatal.
    #[error("malformed blame output: {0}")]
    MalformedBlame(String),
}

impl From<git2::Error> for Error {
    fn from(e: git2::Error) -> Self {
        Error::VcsQuery(e.message().to_string())
    }
}

/// Structured blame result for a single line: the commit that last
/// touched it and that commit's author time as raw epoch + offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlameRecord {
    pub commit: CommitId,
    pub author: String,
    pub seconds: i64,
    pub offset_minutes: i32,
}

impl BlameRecord {
    /// Render the author time as the sortable stamp used to order the
    /// replay plan: local date and time with the recorded UTC offset,
    /// e.g. `2012-04-17T14:12:29+0100`.
    pub fn stamp(&self) -> Result<CommitStamp, Error> {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60).ok_or_else(|| {
            Error::MalformedBlame(format!(
                "commit {} has impossible utc offset {} minutes",
                self.commit, self.offset_minutes
            ))
        })?;
        let when = offset
            .timestamp_opt(self.seconds, 0)
            .single()
            .ok_or_else(|| {
                Error::MalformedBlame(format!(
                    "commit {} has unrepresentable author time {}",
                    self.commit, self.seconds
                ))
            })?;
        Ok(CommitStamp(when.format("%Y-%m-%dT%H:%M:%S%z").to_string()))
    }
}

/// First message line and touched paths of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDetail {
    pub summary: String,
    pub paths: Vec<String>,
}

/// Query/command port onto the version-control backend. Every call
/// takes the repository path explicitly; nothing reads ambient state
/// like the process working directory. The attribution engine and the
/// reporter are written purely against this trait so their ordering and
/// deduplication logic can run against a scripted fake.
pub trait Vcs {
    /// Unified diff text of `from_rev` -> `to_rev`.
    fn diff(&self, repo: &Path, from_rev: &str, to_rev: &str) -> Result<String, Error>;

    /// Who last touched `file:line` as of `rev`. `line` is 1-based.
    fn blame(&self, repo: &Path, rev: &str, file: &str, line: u32) -> Result<BlameRecord, Error>;

    /// Commits reachable from `modified_rev` but not patch-equivalent to
    /// anything reachable from `upstream_rev`, oldest first.
    fn cherry(&self, repo: &Path, upstream_rev: &str, modified_rev: &str)
        -> Result<Vec<CommitId>, Error>;

    /// First message line plus the list of paths the commit touched.
    fn show(&self, repo: &Path, commit: &CommitId) -> Result<CommitDetail, Error>;

    /// Detached checkout of `rev`, leaving HEAD off any branch.
    fn checkout_detached(&self, repo: &Path, rev: &str) -> Result<(), Error>;

    /// Apply the commits onto HEAD in order. Stops at the first commit
    /// that does not apply cleanly; the repository is left mid-pick for
    /// the operator to resolve.
    fn cherry_pick(&self, repo: &Path, commits: &[CommitId]) -> Result<(), Error>;
}
