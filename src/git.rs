// src/git.rs

use std::collections::HashSet;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Commit, DiffFindOptions, DiffFormat, DiffOptions, Oid, Repository, Sort};

use crate::model::CommitId;
use crate::vcs::{BlameRecord, CommitDetail, Error, Vcs};

/// libgit2-backed implementation of the VCS port. Stateless: every call
/// opens the repository at the given path, so no handle outlives a
/// query and nothing depends on the process working directory.
pub struct GitVcs;

impl GitVcs {
    fn resolve<'r>(repo: &'r Repository, rev: &str) -> Result<Commit<'r>, Error> {
        Ok(repo.revparse_single(rev)?.peel_to_commit()?)
    }
}

impl Vcs for GitVcs {
    fn diff(&self, repo_path: &Path, from_rev: &str, to_rev: &str) -> Result<String, Error> {
        let repo = Repository::open(repo_path)?;
        let old_tree = Self::resolve(&repo, from_rev)?.tree()?;
        let new_tree = Self::resolve(&repo, to_rev)?.tree()?;

        let mut opts = DiffOptions::new();
        opts.ignore_filemode(true);
        let mut diff =
            repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))?;
        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => text.push(line.origin()),
                _ => {}
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;
        Ok(text)
    }

    fn blame(
        &self,
        repo_path: &Path,
        rev: &str,
        file: &str,
        line: u32,
    ) -> Result<BlameRecord, Error> {
        let repo = Repository::open(repo_path)?;
        let newest = Self::resolve(&repo, rev)?.id();

        let mut opts = git2::BlameOptions::new();
        opts.newest_commit(newest)
            .min_line(line as usize)
            .max_line(line as usize);
        let blame = repo.blame_file(Path::new(file), Some(&mut opts))?;
        let hunk = blame.get_line(line as usize).ok_or_else(|| {
            Error::VcsQuery(format!("no line {line} in {file} at {rev}"))
        })?;

        let signature = hunk.final_signature();
        let when = signature.when();
        Ok(BlameRecord {
            commit: CommitId(hunk.final_commit_id().to_string()),
            author: signature.name().unwrap_or("").to_string(),
            seconds: when.seconds(),
            offset_minutes: when.offset_minutes(),
        })
    }

    fn cherry(
        &self,
        repo_path: &Path,
        upstream_rev: &str,
        modified_rev: &str,
    ) -> Result<Vec<CommitId>, Error> {
        let repo = Repository::open(repo_path)?;
        let upstream = Self::resolve(&repo, upstream_rev)?.id();
        let modified = Self::resolve(&repo, modified_rev)?.id();

        // Patch-ids of everything only upstream has; a branch commit
        // whose patch-id lands in this set is already applied there.
        let mut upstream_patch_ids = HashSet::new();
        let mut walk = repo.revwalk()?;
        walk.push(upstream)?;
        walk.hide(modified)?;
        for oid in walk {
            if let Some(pid) = patch_id(&repo, oid?)? {
                upstream_patch_ids.insert(pid);
            }
        }

        let mut walk = repo.revwalk()?;
        walk.push(modified)?;
        walk.hide(upstream)?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            match patch_id(&repo, oid)? {
                Some(pid) if upstream_patch_ids.contains(&pid) => {}
                Some(_) => commits.push(CommitId(oid.to_string())),
                // Merges and empty commits have no usable patch-id.
                None => {}
            }
        }
        Ok(commits)
    }

    fn show(&self, repo_path: &Path, commit: &CommitId) -> Result<CommitDetail, Error> {
        let repo = Repository::open(repo_path)?;
        let commit = repo.find_commit(Oid::from_str(commit.as_str())?)?;
        let summary = commit.summary().unwrap_or("").to_string();

        let parent_tree = match commit.parent_count() {
            0 => None,
            _ => Some(commit.parent(0)?.tree()?),
        };
        let tree = commit.tree()?;
        let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

        let mut paths = Vec::new();
        for delta in diff.deltas() {
            let path = delta.new_file().path().or_else(|| delta.old_file().path());
            if let Some(path) = path.and_then(|p| p.to_str()) {
                paths.push(path.to_string());
            }
        }
        Ok(CommitDetail { summary, paths })
    }

    fn checkout_detached(&self, repo_path: &Path, rev: &str) -> Result<(), Error> {
        let repo = Repository::open(repo_path)?;
        let object = repo.revparse_single(rev)?;
        let commit = object.peel_to_commit()?;
        let mut checkout = CheckoutBuilder::new();
        checkout.safe();
        repo.checkout_tree(&object, Some(&mut checkout))?;
        repo.set_head_detached(commit.id())?;
        Ok(())
    }

    fn cherry_pick(&self, repo_path: &Path, commits: &[CommitId]) -> Result<(), Error> {
        let repo = Repository::open(repo_path)?;
        for id in commits {
            let commit = repo.find_commit(Oid::from_str(id.as_str())?)?;
            repo.cherrypick(&commit, None)?;

            let mut index = repo.index()?;
            if index.has_conflicts() {
                return Err(Error::VcsQuery(format!(
                    "cherry-pick of {} stopped on conflicts; resolve and continue manually",
                    id.short()
                )));
            }
            let tree = repo.find_tree(index.write_tree()?)?;
            index.write()?;
            let head = repo.head()?.peel_to_commit()?;
            repo.commit(
                Some("HEAD"),
                &commit.author(),
                &commit.committer(),
                commit.message().unwrap_or(""),
                &tree,
                &[&head],
            )?;
            repo.cleanup_state()?;
        }
        Ok(())
    }
}

/// Patch-id of a non-merge commit's change against its first parent,
/// or `None` when a patch-id is meaningless (merge, empty commit).
fn patch_id(repo: &Repository, oid: Oid) -> Result<Option<Oid>, Error> {
    let commit = repo.find_commit(oid)?;
    if commit.parent_count() > 1 {
        return Ok(None);
    }
    let parent_tree = match commit.parent_count() {
        0 => None,
        _ => Some(commit.parent(0)?.tree()?),
    };
    let tree = commit.tree()?;
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    if diff.deltas().count() == 0 {
        return Ok(None);
    }
    Ok(Some(diff.patchid(None)?))
}
