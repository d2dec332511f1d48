// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay the commits behind a branch onto a detached checkout of
    /// its old upstream revision
    Replay(ReplayArgs),
    /// List files touched by more than one branch commit
    Overlaps(OverlapsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// Path to the git repository
    pub repo: PathBuf,

    /// The branch (or revision) carrying your changes
    pub modified_rev: String,

    /// The upstream revision the branch is based on
    pub upstream_rev: String,
}

#[derive(clap::Args, Debug)]
pub struct OverlapsArgs {
    /// Path to the git repository
    pub repo: PathBuf,

    /// The branch (or revision) carrying your changes
    pub modified_rev: String,

    /// The upstream revision the branch is based on
    pub upstream_rev: String,

    /// Paths to exclude from the report
    pub ignore_paths: Vec<String>,
}
