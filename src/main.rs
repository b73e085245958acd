use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::error::{UserError, user_error};
use is_terminal::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GITLET_LOG";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A miniature version-control system",
    long_about = "A miniature content-addressed version-control system with branches, \
    three-way merges and filesystem remotes.",
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

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add { file: String },
    #[command(name = "commit", about = "Record the staged snapshot")]
    Commit {
        #[arg(help = "The commit message", allow_hyphen_values = true)]
        message: Option<String>,
    },
    #[command(name = "rm", about = "Unstage a file, or stage a tracked file for removal")]
    Rm { file: String },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(allow_hyphen_values = true)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "Forms: `checkout <branch>`, `checkout -- <file>` and \
        `checkout <commit> -- <file>`."
    )]
    Checkout {
        target: Option<String>,
        #[arg(last = true)]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch { name: String },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch { name: String },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset { commit: String },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge { branch: String },
    #[command(name = "add-remote", about = "Register another repository root")]
    AddRemote { name: String, path: String },
    #[command(name = "rm-remote", about = "Forget a remote")]
    RmRemote { name: String },
    #[command(name = "push", about = "Publish the current branch to a remote branch")]
    Push { remote: String, branch: String },
    #[command(name = "fetch", about = "Copy a remote branch into its tracking branch")]
    Fetch { remote: String, branch: String },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull { remote: String, branch: String },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile { sha: String },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        file: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return usage_failure(error),
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(&error),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let path = match &cli.command {
        Commands::Init { path: Some(path) } => {
            std::fs::create_dir_all(path)?;
            path.clone()
        }
        _ => std::env::current_dir()?.to_string_lossy().into_owned(),
    };
    let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

    match cli.command {
        Commands::Init { .. } => repository.init().await,
        Commands::Add { file } => repository.add(&file).await,
        Commands::Commit { message } => {
            repository.commit(message.as_deref().unwrap_or_default()).await
        }
        Commands::Rm { file } => repository.rm(&file).await,
        Commands::Log => repository.log().await,
        Commands::GlobalLog => repository.global_log().await,
        Commands::Find { message } => repository.find(&message).await,
        Commands::Status => repository.status().await,
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout(&branch).await,
            (commit, Some(file)) => repository.checkout_file(commit.as_deref(), &file).await,
            (None, None) => Err(UserError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await,
        Commands::RmBranch { name } => repository.rm_branch(&name).await,
        Commands::Reset { commit } => repository.reset(&commit).await,
        Commands::Merge { branch } => repository.merge(&branch).await,
        Commands::AddRemote { name, path } => repository.add_remote(&name, &path).await,
        Commands::RmRemote { name } => repository.rm_remote(&name).await,
        Commands::Push { remote, branch } => repository.push(&remote, &branch).await,
        Commands::Fetch { remote, branch } => repository.fetch(&remote, &branch).await,
        Commands::Pull { remote, branch } => repository.pull(&remote, &branch).await,
        Commands::CatFile { sha } => repository.cat_file(&sha),
        Commands::HashObject { write, file } => repository.hash_object(&file, write),
    }
}

/// Map clap's parse failures onto the user-facing messages
fn usage_failure(error: clap::Error) -> ExitCode {
    let user_error = match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => error.exit(),
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            UserError::NoCommand
        }
        ErrorKind::InvalidSubcommand => UserError::UnknownCommand,
        _ => UserError::IncorrectOperands,
    };

    println!("{user_error}");
    ExitCode::from(1)
}

fn report(error: &anyhow::Error) -> ExitCode {
    if let Some(user_error) = user_error(error) {
        println!("{user_error}");
        return ExitCode::from(1);
    }

    let prefix = if std::io::stderr().is_terminal() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    };
    eprintln!("{prefix} {error:#}");

    ExitCode::from(2)
}
