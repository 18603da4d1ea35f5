use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bumpify::cli::{BumpCommand, InitCommand};
use bumpify::config::{self, DEFAULT_CONFIG_FILE};
use bumpify::fs::DirFileSystem;
use bumpify::git::Git2Repository;
use bumpify::ui;

#[derive(Parser)]
#[command(
    name = "bumpify",
    version,
    about = "Bump semantic versions and generate changelogs from conventional commits"
)]
struct Args {
    #[arg(
        short = 'c',
        long = "config-file-path",
        default_value = DEFAULT_CONFIG_FILE,
        help = "Configuration file path, relative to the project root"
    )]
    config_file_path: PathBuf,

    #[arg(long, help = "Enable debug logging")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a default configuration file
    Init,
    /// Bump the version, update changelog and version files, commit and tag
    Bump {
        #[arg(long, help = "Preview the new version without making changes")]
        dry_run: bool,
    },
}

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("bumpify")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn run(args: Args) -> Result<bool> {
    let project_root = std::env::current_dir().context("Cannot determine project root")?;
    let config_path = project_root.join(&args.config_file_path);

    match args.command {
        Command::Init => {
            let outcome = InitCommand::new(&config_path).init()?;
            ui::report_init(&outcome);
            Ok(true)
        }
        Command::Bump { dry_run } => {
            let config = config::load_config(&config_path)?;
            let repo = Git2Repository::open(&project_root)?;
            let fs = DirFileSystem::new(&project_root);
            let command = BumpCommand::new(config, repo, fs);
            let outcome = command.bump(dry_run)?;
            let planned = if dry_run {
                command.release_actions(&outcome)
            } else {
                Vec::new()
            };
            Ok(ui::report_bump(&outcome, &planned))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logger(args.debug)?;

    match run(args) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}
