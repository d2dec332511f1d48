// src/report.rs

use std::collections::HashMap;
use std::path::Path;

use crate::model::{CommitId, PathCommitIndex, PathEntry};
use crate::vcs::{Error, Vcs};

/// Group the branch-only commits (per the patch-equivalence query) by
/// the files they touch and keep the files hit by more than one commit.
/// A review aid for squashing scattered cleanup commits before a
/// replay plan is built, not a replay input: paths stay in discovery
/// order and commits stay in the order the cherry query returned them.
pub fn find_multi_commit_paths(
    vcs: &dyn Vcs,
    repo: &Path,
    modified_rev: &str,
    upstream_rev: &str,
    ignore_paths: &[String],
) -> Result<PathCommitIndex, Error> {
    let commits = vcs.cherry(repo, upstream_rev, modified_rev)?;

    // Discovery-ordered entries; the map only remembers positions.
    let mut entries: Vec<PathEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut summaries: HashMap<CommitId, String> = HashMap::new();

    for commit in commits {
        let detail = vcs.show(repo, &commit)?;
        summaries.insert(commit.clone(), detail.summary);

        for path in detail.paths {
            if ignore_paths.iter().any(|ignored| *ignored == path) {
                continue;
            }
            match positions.get(&path) {
                Some(&at) => entries[at].commits.push(commit.clone()),
                None => {
                    positions.insert(path.clone(), entries.len());
                    entries.push(PathEntry {
                        path,
                        commits: vec![commit.clone()],
                    });
                }
            }
        }
    }

    entries.retain(|entry| entry.commits.len() > 1);
    Ok(PathCommitIndex { entries, summaries })
}
