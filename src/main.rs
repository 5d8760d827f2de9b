use clap::{Parser, Subcommand};
use gitx_core::{CommitFilter, GitClient, diff, graph};

#[derive(Parser)]
#[command(name = "gitx")]
#[command(about = "Commit graph and hunk-level staging from the command line")]
struct Cli {
    /// Path to the repository
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the commit history as a lane graph
    Log {
        /// Maximum number of commits to show
        #[arg(long, default_value_t = 10_000)]
        limit: usize,
        /// Local branches only
        #[arg(long, conflicts_with = "branch")]
        local: bool,
        /// A single branch to walk
        #[arg(long)]
        branch: Option<String>,
    },
    /// List changed files, staged and unstaged
    Status,
    /// Show the diff for one file with numbered hunks
    Diff {
        path: String,
        /// Diff the index against HEAD instead of the worktree
        #[arg(long)]
        staged: bool,
    },
    /// Stage a whole file, or one hunk of it
    Stage {
        path: String,
        /// Hunk number from `gitx diff` (1-based)
        #[arg(long)]
        hunk: Option<usize>,
    },
    /// Unstage a whole file, or one hunk of it
    Unstage {
        path: String,
        /// Hunk number from `gitx diff --staged` (1-based)
        #[arg(long)]
        hunk: Option<usize>,
    },
    /// Discard worktree changes to a file, or one hunk of them
    Discard {
        path: String,
        /// Hunk number from `gitx diff` (1-based)
        #[arg(long)]
        hunk: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GitClient::new(&cli.repo);

    match cli.command {
        Commands::Log {
            limit,
            local,
            branch,
        } => {
            let filter = match branch {
                Some(name) => CommitFilter::SingleBranch(name),
                None if local => CommitFilter::LocalOnly,
                None => CommitFilter::All,
            };
            let commits = client.commits(&filter, limit)?;
            print!("{}", graph::format_graph(&commits));
        }
        Commands::Status => {
            for entry in client.status()? {
                let side = if entry.staged { "staged" } else { "unstaged" };
                println!("{side:>8}  {:<9}  {}", entry.kind.to_string(), entry.path);
            }
        }
        Commands::Diff { path, staged } => {
            let text = client.diff(&path, staged)?;
            print!("{}", diff::format_diff(&diff::Diff::parse(&text)));
        }
        Commands::Stage { path, hunk } => match hunk {
            Some(index) => {
                let (header, body) = locate_hunk(&client, &path, false, index)?;
                client.stage_hunk(&path, &header, &body)?;
            }
            None => client.stage_file(&path)?,
        },
        Commands::Unstage { path, hunk } => match hunk {
            Some(index) => {
                let (header, body) = locate_hunk(&client, &path, true, index)?;
                client.unstage_hunk(&path, &header, &body)?;
            }
            None => client.unstage_file(&path)?,
        },
        Commands::Discard { path, hunk } => match hunk {
            Some(index) => {
                let (header, body) = locate_hunk(&client, &path, false, index)?;
                client.discard_hunk(&path, &header, &body)?;
            }
            None => client.discard_file(&path)?,
        },
    }

    Ok(())
}

/// Resolve a 1-based hunk index against the current diff for a file.
fn locate_hunk(
    client: &GitClient,
    path: &str,
    staged: bool,
    index: usize,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    let text = client.diff(path, staged)?;
    let parsed = diff::Diff::parse(&text);
    let hunk = parsed
        .file(path)
        .and_then(|file| file.hunks.get(index.checked_sub(1)?))
        .ok_or_else(|| format!("No hunk #{index} in the current diff for {path}"))?;
    Ok((hunk.header(), hunk.body()))
}
