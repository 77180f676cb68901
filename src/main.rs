use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use costroll::cli::{
    handle_allocate_command, handle_report_command, handle_rollup_command, handle_summary_command,
    handle_toggle_command, handle_tree_command, AllocateArgs, ReportArgs, RollupArgs, SummaryArgs,
    ToggleArgs, TreeArgs,
};
use costroll::config::{CostrollPaths, Settings};

#[derive(Parser)]
#[command(
    name = "costroll",
    version,
    about = "Hierarchical cost allocation and financial rollup",
    long_about = "costroll distributes priced line items over a tree of expense objects, \
                  rolls the allocated amounts up the tree, and classifies the resulting \
                  profit margin."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and print the expense object tree
    Tree(TreeArgs),

    /// Toggle expense objects in a selection and propagate to parents
    Toggle(ToggleArgs),

    /// Show the per-line allocation table
    #[command(alias = "alloc")]
    Allocate(AllocateArgs),

    /// Show bottom-up cost totals
    Rollup(RollupArgs),

    /// Show revenue, cost, profit and margin status
    Summary(SummaryArgs),

    /// Write the full report as JSON, YAML or CSV
    Report(ReportArgs),

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = CostrollPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Tree(args)) => handle_tree_command(args)?,
        Some(Commands::Toggle(args)) => handle_toggle_command(args)?,
        Some(Commands::Allocate(args)) => handle_allocate_command(&settings, args)?,
        Some(Commands::Rollup(args)) => handle_rollup_command(&settings, args)?,
        Some(Commands::Summary(args)) => handle_summary_command(&settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&settings, args)?,
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
                println!();
            }
            println!("costroll Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        None => {
            println!("costroll - hierarchical cost allocation and financial rollup");
            println!();
            println!("Run 'costroll --help' for usage information.");
        }
    }

    Ok(())
}
