//! Pull request CLI command handlers

use crate::cli::commands::{PollingArgs, PrCommand};
use crate::cli::git::short_sha;
use crate::cli::{emit, Context};
use crate::core::config::PollingConfig;
use crate::core::RepoSlug;
use crate::error::{AgentError, Result};
use crate::github::status::PullRequestStatus;
use crate::github::{
    CreatePrParams, MergeMethod, MonitorReport, MonitorState, PrMonitor, PullRequestHandler,
};

/// Handle `repo`
pub async fn handle_repo(ctx: &Context) -> Result<()> {
    let slug = ctx.repo_slug()?;
    let client = ctx.github_client()?;
    let handler = PullRequestHandler::new(&client);

    let result = handler.get_repo_info(&slug).await;
    emit(ctx, result, &format!("Repository {}", slug), |info| {
        let field = |key: &str| info.get(key).and_then(|v| v.as_str()).unwrap_or("-");
        println!("{}", field("full_name"));
        println!("  {}", field("html_url"));
        println!("  default branch: {}", field("default_branch"));
        if let Some(description) = info.get("description").and_then(|v| v.as_str()) {
            println!("  {}", description);
        }
    })
}

/// Handle pull request commands
pub async fn handle_pr(ctx: &Context, command: PrCommand) -> Result<()> {
    let slug = ctx.repo_slug()?;
    let client = ctx.github_client()?;
    let handler = PullRequestHandler::new(&client);

    match command {
        PrCommand::Create {
            base,
            head,
            title,
            body,
        } => handle_create(ctx, &handler, &slug, base, head, title, body).await,
        PrCommand::Status { number } => handle_status(ctx, &handler, &slug, number).await,
        PrCommand::Watch { number, polling } => {
            let monitor = monitor_for(&ctx.config.polling, &polling);
            let result = watch(&handler, &slug, number, &monitor).await;
            emit(ctx, result, &format!("Watched pull request #{}", number), print_monitor_report)
        }
        PrCommand::Merge { number, method } => {
            let result = handler.merge_pr(&slug, number, MergeMethod::from(method)).await;
            emit(ctx, result, &format!("Merged pull request #{}", number), |response| {
                match &response.sha {
                    Some(sha) => println!("✓ Merged pull request #{} ({})", number, short_sha(sha)),
                    None => println!("✓ Merged pull request #{}", number),
                }
            })
        }
    }
}

async fn handle_create(
    ctx: &Context,
    handler: &PullRequestHandler<'_>,
    slug: &RepoSlug,
    base: String,
    head: Option<String>,
    title: String,
    body: Option<String>,
) -> Result<()> {
    let head = match head {
        Some(head) => head,
        None => ctx.open_git()?.current_branch()?,
    };

    let mut params = CreatePrParams::new(base, head, title);
    if let Some(body) = body {
        params = params.with_body(body);
    }

    let result = handler.create_pr(slug, &params).await;
    emit(ctx, result, "Pull request created", |pr| {
        println!("✓ Created pull request #{}: {}", pr.number, pr.title);
        println!("  {} → {}", pr.head.ref_field, pr.base.ref_field);
        println!("  {}", pr.html_url);
    })
}

async fn handle_status(
    ctx: &Context,
    handler: &PullRequestHandler<'_>,
    slug: &RepoSlug,
    number: u64,
) -> Result<()> {
    let result = handler.get_pr_status(slug, number).await;
    emit(
        ctx,
        result,
        &format!("Status of pull request #{}", number),
        print_status,
    )
}

/// Monitor built from config, with command line overrides applied
pub(crate) fn monitor_for(config: &PollingConfig, overrides: &PollingArgs) -> PrMonitor {
    let mut polling = config.clone();
    if let Some(interval) = overrides.interval {
        polling.interval_secs = interval;
    }
    if let Some(max_attempts) = overrides.max_attempts {
        polling.max_attempts = max_attempts;
    }
    PrMonitor::from_config(&polling)
}

/// Run the monitor until it finishes or the user presses Ctrl-C
pub(crate) async fn watch(
    handler: &PullRequestHandler<'_>,
    slug: &RepoSlug,
    number: u64,
    monitor: &PrMonitor,
) -> Result<MonitorReport> {
    eprintln!(
        "Watching pull request #{} every {}s (up to {} checks)...",
        number,
        monitor.interval().as_secs(),
        monitor.max_attempts()
    );

    tokio::select! {
        report = handler.monitor_pr(slug, number, monitor) => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(number, "monitoring interrupted");
            Err(AgentError::Cancelled)
        }
    }
}

pub(crate) fn print_status(status: &PullRequestStatus) {
    let mark = |ok: bool| if ok { "✓" } else { "✗" };

    println!("Pull request #{} ({:?})", status.number, status.state);
    println!("  {} approved", mark(status.is_approved()));
    println!(
        "  {} checks passing ({} run(s))",
        mark(status.checks_passing()),
        status.check_runs.len()
    );
    for run in status.check_runs.iter().filter(|run| !run.is_success()) {
        let conclusion = run
            .conclusion
            .map(|c| format!("{:?}", c).to_lowercase())
            .unwrap_or_else(|| run.status.clone());
        println!("      {} {}", run.name, conclusion);
    }
    println!(
        "  {} mergeable ({})",
        mark(status.is_mergeable()),
        status.mergeable_state
    );

    if status.ready_to_merge() {
        println!("\nReady to merge.");
    } else {
        println!("\nBlocked: {}", status.blocking_reasons().join("; "));
    }
}

pub(crate) fn print_monitor_report(report: &MonitorReport) {
    match report.state {
        MonitorState::ReadyToMerge => {
            println!("✓ Ready to merge after {} check(s)", report.attempts)
        }
        MonitorState::Closed => println!("✗ Pull request was closed"),
        MonitorState::TimedOut => {
            println!("✗ Gave up after {} check(s)", report.attempts)
        }
        MonitorState::Polling | MonitorState::Failed => {}
    }
    if let Some(status) = &report.status {
        println!();
        print_status(status);
    }
}
