use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use emblem::{FileKind, Repository, ScanToken, StatusTag, StrategyKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "emblem",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A working-tree status resolution engine",
    long_about = "Classifies every file and directory of a git working tree into \
    the emblem taxonomy (normal, added, removed, modified, missing, untracked, \
    ignored, error), with directory statuses rolled up from their children.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Read the repository directly and hash working files
    Hash,
    /// Parse the output of an external git binary
    Tool,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Hash => StrategyKind::ContentHash,
            Strategy::Tool => StrategyKind::ToolOutput,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "status",
        about = "Resolve the status of every path under the given roots",
        long_about = "This command classifies each file and directory under the given \
        paths (the whole repository when none are given) and prints one line per \
        path that is not in the normal state."
    )]
    Status {
        #[arg(index = 1, help = "The paths to scan, relative or absolute")]
        paths: Vec<PathBuf>,
        #[arg(short, long, value_enum, help = "Force a classifier strategy")]
        strategy: Option<Strategy>,
        #[arg(short, long, help = "Also print paths in the normal state")]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Status {
            paths,
            strategy,
            all,
        } => {
            let pwd = std::env::current_dir()?;
            let repository = match strategy {
                Some(strategy) => Repository::open_with_strategy(&pwd, (*strategy).into())?,
                None => Repository::discover(&pwd).await?,
            };

            // path arguments are relative to the invocation directory, not
            // the repository root
            let paths: Vec<PathBuf> = paths
                .iter()
                .map(|path| {
                    if path.is_absolute() {
                        path.clone()
                    } else {
                        pwd.join(path)
                    }
                })
                .collect();

            let results = repository.status().scan(&paths, &ScanToken::new()).await?;
            for result in results {
                if result.tag == StatusTag::Normal && !all {
                    continue;
                }
                let suffix = match result.kind {
                    FileKind::Directory => "/",
                    FileKind::File => "",
                };
                println!("{} {}{suffix}", result.tag, result.path.display());
            }
        }
    }

    Ok(())
}
