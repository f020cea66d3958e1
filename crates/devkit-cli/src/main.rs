mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::package::PackageArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devkit",
    about = "Developer workflow tools for agents: package installs, linting and scripts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: nearest directory with a package.json)
    #[arg(long, global = true, env = "DEVKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which package manager governs the project
    Detect,

    /// Install packages with the detected package manager
    Add {
        /// Package names (e.g. react, react-dom@18)
        #[arg(required = true)]
        packages: Vec<String>,

        /// Install as development dependencies
        #[arg(long, short = 'D')]
        dev: bool,

        /// Timeout in seconds (0 = none; default from config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove packages with the detected package manager
    Remove {
        /// Package names
        #[arg(required = true)]
        packages: Vec<String>,

        /// Timeout in seconds (0 = none; default from config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Lint a file and apply automatic fixes
    Lint {
        /// File to lint (relative to the project root)
        file: PathBuf,

        /// Report problems without writing fixes
        #[arg(long)]
        no_fix: bool,
    },

    /// Run a TypeScript/JavaScript file (or `-` for stdin) in the project root
    Script {
        source: String,

        /// typescript or javascript (default: from the file extension)
        #[arg(long)]
        lang: Option<String>,
    },

    /// List the tools exposed to agents
    Tools,

    /// Run as an MCP stdio server exposing the tools
    Mcp,

    /// Inspect the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    // stdout belongs to command output (and the MCP protocol); logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Detect => cmd::detect::run(&root, cli.json),
        Commands::Add {
            packages,
            dev,
            timeout,
            dry_run,
        } => cmd::package::add(
            &root,
            PackageArgs {
                packages,
                timeout,
                dry_run,
            },
            dev,
            cli.json,
        ),
        Commands::Remove {
            packages,
            timeout,
            dry_run,
        } => cmd::package::remove(
            &root,
            PackageArgs {
                packages,
                timeout,
                dry_run,
            },
            cli.json,
        ),
        Commands::Lint { file, no_fix } => cmd::lint::run(&root, &file, !no_fix, cli.json),
        Commands::Script { source, lang } => {
            cmd::script::run(&root, &source, lang.as_deref(), cli.json)
        }
        Commands::Tools => cmd::tools::run(cli.json),
        Commands::Mcp => cmd::mcp::run(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
