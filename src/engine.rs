// src/engine.rs

use std::collections::BTreeSet;
use std::path::Path;

use indicatif::ProgressBar;

use crate::model::{Attribution, ReplayPlan};
use crate::patch;
use crate::vcs::{Error, Vcs};

/// Attribute every line the branch added relative to `upstream_rev` to
/// the commit that last touched it, then order the deduplicated commits
/// oldest first for sequential replay.
///
/// Each inserted line is blamed at its new line number against the
/// *modified* revision; that is the only blame query guaranteed to be
/// meaningful, since the line did not exist at that position upstream.
/// Pure deletions are skipped: a commit that only removed lines leaves
/// no trace here and must be picked manually. Any failed query aborts
/// the run; a partial plan would silently drop a required commit.
pub fn compute_replay_plan(
    vcs: &dyn Vcs,
    repo: &Path,
    modified_rev: &str,
    upstream_rev: &str,
) -> Result<ReplayPlan, Error> {
    let diff_text = vcs.diff(repo, upstream_rev, modified_rev)?;
    let files = patch::parse_patch(&diff_text);

    let total: u64 = files.iter().map(|f| f.inserted_lines().count() as u64).sum();
    let bar = ProgressBar::new(total);
    bar.set_message("Blaming inserted lines");

    // BTreeSet does both jobs at once: one entry per commit, ordered by
    // (stamp, id).
    let mut attributions: BTreeSet<Attribution> = BTreeSet::new();
    for file in &files {
        let Some(path) = file.new_path.as_deref() else {
            continue;
        };
        for line in file.inserted_lines() {
            let record = vcs.blame(repo, modified_rev, path, line)?;
            let stamp = record.stamp()?;
            attributions.insert(Attribution {
                stamp,
                id: record.commit,
            });
            bar.inc(1);
        }
    }
    bar.finish_and_clear();

    Ok(ReplayPlan {
        commits: attributions.into_iter().map(|a| a.id).collect(),
    })
}
