//! git-agent - git and GitHub pull request automation
//!
//! Available as the `git-agent` command.

use clap::Parser;

use git_agent::cli::commands::{Cli, Commands};
use git_agent::cli::{git, pr, ship, Context};
use git_agent::core::Config;
use git_agent::error::Result;
use git_agent::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(&config.logging)?;

    let ctx = Context::new(&cli, config);

    match cli.command {
        Commands::Pull { branch } => git::handle_pull(&ctx, branch),
        Commands::Branch { name } => git::handle_branch(&ctx, name),
        Commands::Push(args) => git::handle_push(&ctx, args),
        Commands::Stash => git::handle_stash(&ctx),
        Commands::StashPop => git::handle_stash_pop(&ctx),
        Commands::Merge(args) => git::handle_merge(&ctx, args),
        Commands::Conflicts => git::handle_conflicts(&ctx),
        Commands::Resolve(args) => git::handle_resolve(&ctx, args),
        Commands::Repo => pr::handle_repo(&ctx).await,
        Commands::Pr(args) => pr::handle_pr(&ctx, args.command).await,
        Commands::Ship(args) => ship::handle_ship(&ctx, args).await,
    }
}
