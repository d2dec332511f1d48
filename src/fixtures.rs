// src/fixtures.rs
//
// Test-only helpers for building throwaway repositories on disk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature, Time};
use tempfile::TempDir;

use crate::model::CommitId;
use crate::vcs::{BlameRecord, CommitDetail, Error, Vcs};

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn init() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Repository::init(dir.path()).expect("init repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write file");
    }

    /// Stage the whole worktree and commit it onto HEAD. The author time
    /// is fixed so orderings in tests are deterministic.
    pub fn commit(&self, message: &str, author_epoch: i64) -> Oid {
        let mut index = self.repo.index().expect("open index");
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .expect("stage worktree");
        index.write().expect("write index");
        let tree_id = index.write_tree().expect("write tree");
        let tree = self.repo.find_tree(tree_id).expect("find tree");

        let sig = self.signature(author_epoch);
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("commit")
    }

    /// Dangling commit reusing another commit's tree; gives a second
    /// commit with the same patch-id but different metadata.
    pub fn commit_with_tree_of(
        &self,
        message: &str,
        author_epoch: i64,
        parent: Oid,
        tree_source: Oid,
    ) -> Oid {
        let tree = self
            .repo
            .find_commit(tree_source)
            .expect("find tree source")
            .tree()
            .expect("tree of source");
        let parent = self.repo.find_commit(parent).expect("find parent");
        let sig = self.signature(author_epoch);
        self.repo
            .commit(None, &sig, &sig, message, &tree, &[&parent])
            .expect("commit")
    }

    fn signature(&self, epoch: i64) -> Signature<'static> {
        Signature::new("Test Author", "test@example.com", &Time::new(epoch, 0))
            .expect("build signature")
    }
}

/// Scripted stand-in for the VCS port. Engine and reporter tests load
/// it with canned diff text, blame answers, and commit details; any
/// query it was not scripted for fails like the real backend would.
#[derive(Default)]
pub struct FakeVcs {
    pub diff_text: String,
    pub blames: HashMap<(String, u32), BlameRecord>,
    pub failing_blames: HashSet<(String, u32)>,
    pub cherry_commits: Vec<CommitId>,
    pub details: HashMap<CommitId, CommitDetail>,
}

impl FakeVcs {
    pub fn blame_at(&mut self, file: &str, line: u32, commit: &str, seconds: i64) {
        self.blames.insert(
            (file.to_string(), line),
            BlameRecord {
                commit: CommitId(commit.to_string()),
                author: "Test Author".to_string(),
                seconds,
                offset_minutes: 0,
            },
        );
    }

    pub fn failing_blame_at(&mut self, file: &str, line: u32) {
        self.failing_blames.insert((file.to_string(), line));
    }

    /// Append a commit to the scripted cherry result and record its
    /// summary and touched paths.
    pub fn commit(&mut self, id: &str, summary: &str, paths: &[&str]) {
        let id = CommitId(id.to_string());
        self.cherry_commits.push(id.clone());
        self.details.insert(
            id,
            CommitDetail {
                summary: summary.to_string(),
                paths: paths.iter().map(|p| p.to_string()).collect(),
            },
        );
    }
}

impl Vcs for FakeVcs {
    fn diff(&self, _repo: &Path, _from_rev: &str, _to_rev: &str) -> Result<String, Error> {
        Ok(self.diff_text.clone())
    }

    fn blame(
        &self,
        _repo: &Path,
        _rev: &str,
        file: &str,
        line: u32,
    ) -> Result<BlameRecord, Error> {
        let key = (file.to_string(), line);
        if self.failing_blames.contains(&key) {
            return Err(Error::VcsQuery(format!(
                "scripted blame failure for {file}:{line}"
            )));
        }
        self.blames
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::VcsQuery(format!("no scripted blame for {file}:{line}")))
    }

    fn cherry(
        &self,
        _repo: &Path,
        _upstream_rev: &str,
        _modified_rev: &str,
    ) -> Result<Vec<CommitId>, Error> {
        Ok(self.cherry_commits.clone())
    }

    fn show(&self, _repo: &Path, commit: &CommitId) -> Result<CommitDetail, Error> {
        self.details
            .get(commit)
            .cloned()
            .ok_or_else(|| Error::VcsQuery(format!("no scripted detail for {commit}")))
    }

    fn checkout_detached(&self, _repo: &Path, _rev: &str) -> Result<(), Error> {
        Ok(())
    }

    fn cherry_pick(&self, _repo: &Path, _commits: &[CommitId]) -> Result<(), Error> {
        Ok(())
    }
}
