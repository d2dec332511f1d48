// src/main.rs

mod cli;
mod engine;
#[cfg(test)]
mod fixtures;
mod git;
mod model;
mod patch;
mod report;
mod vcs;

use clap::Parser;
use cli::{Args, Command, OverlapsArgs, ReplayArgs};
use git::GitVcs;
use std::time::Instant;
use vcs::{Error, Vcs};

fn main() {
    let args = Args::parse();
    let result = match &args.command {
        Command::Replay(cmd) => replay(&GitVcs, cmd),
        Command::Overlaps(cmd) => overlaps(&GitVcs, cmd),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Compute the replay plan, then check out the upstream revision
/// detached and cherry-pick the plan onto it. Each git command is
/// echoed before it runs so the operator can redo or finish by hand.
fn replay(vcs: &dyn Vcs, cmd: &ReplayArgs) -> Result<(), Error> {
    let start_time = Instant::now();
    let plan = engine::compute_replay_plan(vcs, &cmd.repo, &cmd.modified_rev, &cmd.upstream_rev)?;
    println!(
        "Attributed {} commits in {:.2?}.",
        plan.commits.len(),
        start_time.elapsed()
    );
    if plan.commits.is_empty() {
        println!("Nothing to replay.");
        return Ok(());
    }

    println!(
        "git -C {} checkout --detach {}",
        cmd.repo.display(),
        cmd.upstream_rev
    );
    vcs.checkout_detached(&cmd.repo, &cmd.upstream_rev)?;

    let ids: Vec<&str> = plan.commits.iter().map(|c| c.as_str()).collect();
    println!("git -C {} cherry-pick {}", cmd.repo.display(), ids.join(" "));
    vcs.cherry_pick(&cmd.repo, &plan.commits)?;
    Ok(())
}

fn overlaps(vcs: &dyn Vcs, cmd: &OverlapsArgs) -> Result<(), Error> {
    let index = report::find_multi_commit_paths(
        vcs,
        &cmd.repo,
        &cmd.modified_rev,
        &cmd.upstream_rev,
        &cmd.ignore_paths,
    )?;
    for entry in &index.entries {
        println!("{}", entry.path);
        for commit in &entry.commits {
            println!("  {} {}", commit.short(), index.summary(commit));
        }
    }
    Ok(())
}
