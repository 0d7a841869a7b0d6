//! `ship`: the full branch → push → pull request → merge workflow

use chrono::Utc;
use serde::Serialize;

use crate::cli::commands::ShipArgs;
use crate::cli::git::short_sha;
use crate::cli::pr::{monitor_for, print_monitor_report, watch};
use crate::cli::{emit, Context};
use crate::error::{AgentError, Result};
use crate::github::{
    CreatePrParams, MergeMethod, MergeResponse, MonitorReport, MonitorState, PullRequestHandler,
};

/// Everything `ship` did, in order
#[derive(Debug, Serialize)]
pub struct ShipReport {
    pub branch: String,
    pub commit: String,
    pub pull_request: u64,
    pub url: String,
    pub monitor: MonitorReport,
    pub merge: MergeResponse,
}

/// Branch name used when none is given
pub fn generated_branch_name(prefix: &str, timestamp: i64) -> String {
    format!("{}-{}", prefix, timestamp)
}

/// Handle `ship`
pub async fn handle_ship(ctx: &Context, args: ShipArgs) -> Result<()> {
    let result = ship(ctx, &args).await;
    emit(ctx, result, "Shipped", |report| {
        println!(
            "✓ Shipped {} ({}) via pull request #{}",
            report.branch,
            short_sha(&report.commit),
            report.pull_request
        );
        println!("  {}", report.url);
    })
}

async fn ship(ctx: &Context, args: &ShipArgs) -> Result<ShipReport> {
    let git = ctx.open_git()?;
    let slug = ctx.repo_slug()?;
    // Missing token fails before the working copy is touched
    let client = ctx.github_client()?;
    let handler = PullRequestHandler::new(&client);

    let branch = args
        .branch
        .clone()
        .unwrap_or_else(|| generated_branch_name(&args.prefix, Utc::now().timestamp()));

    git.create_branch(&branch)?;
    let pushed = git.push_changes(Some(&branch), &args.message)?;
    eprintln!("Pushed {} to {}", branch, git.remote());

    let mut params = CreatePrParams::new(args.base.clone(), branch.clone(), args.message.clone());
    if let Some(body) = &args.body {
        params = params.with_body(body.clone());
    }
    let pr = handler.create_pr(&slug, &params).await?;
    eprintln!("Opened pull request #{}: {}", pr.number, pr.html_url);

    let monitor = monitor_for(&ctx.config.polling, &args.polling);
    let report = watch(&handler, &slug, pr.number, &monitor).await?;
    if report.state != MonitorState::ReadyToMerge {
        if !ctx.json {
            print_monitor_report(&report);
        }
        return Err(not_ready(pr.number, &report));
    }

    let merge = handler
        .merge_pr(&slug, pr.number, MergeMethod::from(args.method))
        .await?;

    Ok(ShipReport {
        branch,
        commit: pushed.commit,
        pull_request: pr.number,
        url: pr.html_url,
        monitor: report,
        merge,
    })
}

/// Error for a watch that ended without the pull request becoming ready
fn not_ready(number: u64, report: &MonitorReport) -> AgentError {
    let mut reasons = Vec::new();
    if report.state == MonitorState::TimedOut {
        reasons.push(format!("still blocked after {} check(s)", report.attempts));
    }
    if let Some(status) = &report.status {
        reasons.extend(status.blocking_reasons());
    }
    AgentError::MergeBlocked { number, reasons }
}
