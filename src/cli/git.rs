//! Local git CLI command handlers

use crate::cli::commands::{MergeArgs, PushArgs, ResolveArgs};
use crate::cli::{emit, Context};
use crate::core::{ConflictResolution, MergeStrategy};
use crate::error::Result;

/// Handle `pull`
pub fn handle_pull(ctx: &Context, branch: Option<String>) -> Result<()> {
    let git = ctx.open_git()?;
    let result = git.pull(branch.as_deref());
    emit(ctx, result, "Pulled latest changes", |_| {
        match &branch {
            Some(branch) => println!("✓ Pulled {}/{}", git.remote(), branch),
            None => println!("✓ Pulled latest changes"),
        }
    })
}

/// Handle `branch <name>`
pub fn handle_branch(ctx: &Context, name: String) -> Result<()> {
    let git = ctx.open_git()?;
    let result = git.create_branch(&name);
    emit(ctx, result, &format!("Created and switched to branch {}", name), |_| {
        println!("✓ Switched to a new branch '{}'", name);
    })
}

/// Handle `push -m <message>`
pub fn handle_push(ctx: &Context, args: PushArgs) -> Result<()> {
    let git = ctx.open_git()?;
    let result = git.push_changes(args.branch.as_deref(), &args.message);
    emit(ctx, result, "Changes pushed", |summary| {
        println!(
            "✓ Committed {} and pushed {} to {}",
            short_sha(&summary.commit),
            summary.branch,
            git.remote()
        );
    })
}

/// Handle `stash`
pub fn handle_stash(ctx: &Context) -> Result<()> {
    let git = ctx.open_git()?;
    emit(ctx, git.stash(), "Stashed changes", |_| {
        println!("✓ Stashed working copy changes");
    })
}

/// Handle `stash-pop`
pub fn handle_stash_pop(ctx: &Context) -> Result<()> {
    let git = ctx.open_git()?;
    emit(ctx, git.apply_stash(), "Applied stash", |_| {
        println!("✓ Restored the most recent stash");
    })
}

/// Handle `merge <base> <feature>`
pub fn handle_merge(ctx: &Context, args: MergeArgs) -> Result<()> {
    let git = ctx.open_git()?;
    let strategy = MergeStrategy::from(args.strategy);
    let result = git.merge(&args.base, &args.feature, strategy);
    emit(
        ctx,
        result,
        &format!("Merged {} into {}", args.feature, args.base),
        |summary| {
            println!(
                "✓ Merged {} into {} ({} strategy) at {}",
                summary.feature,
                summary.base,
                summary.strategy,
                short_sha(&summary.commit)
            );
        },
    )
}

/// Handle `conflicts`
pub fn handle_conflicts(ctx: &Context) -> Result<()> {
    let git = ctx.open_git()?;
    let conflicts = git.detect_conflicts();
    let message = format!("{} conflicted path(s)", conflicts.len());
    emit(ctx, Ok(conflicts), &message, |paths| {
        if paths.is_empty() {
            println!("No merge conflicts.");
            return;
        }
        println!("Unresolved conflicts:\n");
        for path in paths {
            println!("  ✗ {}", path);
        }
    })
}

/// Handle `resolve <path> --take <side>`
pub fn handle_resolve(ctx: &Context, args: ResolveArgs) -> Result<()> {
    let git = ctx.open_git()?;
    let resolution = ConflictResolution::from(args.take);
    let result = git.resolve_conflict(&args.path, resolution);
    emit(
        ctx,
        result,
        &format!("Resolved {} using {}", args.path, resolution),
        |_| {
            println!("✓ Resolved {} ({})", args.path, resolution);
        },
    )
}

/// Abbreviated commit id for display
pub(crate) fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
