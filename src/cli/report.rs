//! CLI commands for rollups, financial summaries and full reports

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::config::Settings;
use crate::error::CostrollResult;
use crate::export::{csv, json, yaml};
use crate::reports::RollupView;
use crate::services::{CostEngine, SelectionAction, SummaryInputs};

use super::{open_output, ItemsInput, RevenueArgs, SelectionArgs, TreeInput};

/// Report output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Full report bundle as JSON
    Json,
    /// Full report bundle as YAML
    Yaml,
    /// Allocation cells as CSV
    Csv,
}

/// Arguments for `costroll rollup`
#[derive(Args, Debug)]
pub struct RollupArgs {
    #[command(flatten)]
    pub input: TreeInput,

    #[command(flatten)]
    pub items: ItemsInput,

    // Default: everything selected
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// List only leaf rows; totals are unaffected
    #[arg(long)]
    pub leaf_only: bool,

    /// Write rollup rows as CSV to this file instead
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Arguments for `costroll summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: TreeInput,

    #[command(flatten)]
    pub items: ItemsInput,

    // Default: everything selected
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub revenue: RevenueArgs,
}

/// Arguments for `costroll report`
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: TreeInput,

    #[command(flatten)]
    pub items: ItemsInput,

    // Default: everything selected
    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub revenue: RevenueArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Roll allocated amounts up the tree and print the totals
pub fn handle_rollup_command(settings: &Settings, args: RollupArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;
    let items = args.items.load()?;
    let selection = args.selection.resolve(&tree, SelectionAction::SelectAll)?;

    let engine = CostEngine::new(&tree, settings);
    let table = engine.compute_allocations(&items, &selection);
    let rollup = engine.compute_rollup(&table);

    let view = if args.leaf_only {
        RollupView::LeafOnly
    } else {
        RollupView::Full
    };

    match &args.csv {
        Some(path) => {
            let mut writer = open_output(Some(path.as_path()))?;
            csv::export_rollup_csv(&rollup, &tree, view, &mut writer)?;
            println!("Rollup exported to: {}", path.display());
        }
        None => print!("{}", rollup.format_terminal(&tree, view)),
    }

    Ok(())
}

/// Compute and print revenue, cost, profit and margin status
pub fn handle_summary_command(settings: &Settings, args: SummaryArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;
    let items = args.items.load()?;
    let selection = args.selection.resolve(&tree, SelectionAction::SelectAll)?;

    let engine = CostEngine::new(&tree, settings);
    let table = engine.compute_allocations(&items, &selection);
    let rollup = engine.compute_rollup(&table);
    let summary =
        engine.compute_financial_summary(&items, &rollup, SummaryInputs::from(&args.revenue));

    print!("{}", summary.format_terminal());

    Ok(())
}

/// Compute the full report and write it in the requested format
pub fn handle_report_command(settings: &Settings, args: ReportArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;
    let items = args.items.load()?;
    let selection = args.selection.resolve(&tree, SelectionAction::SelectAll)?;

    let engine = CostEngine::new(&tree, settings);
    let report = engine.compute_report(&items, &selection, SummaryInputs::from(&args.revenue));

    let mut writer = open_output(args.output.as_deref())?;
    match args.format {
        ReportFormat::Json => {
            json::export_report_json(&report, &mut writer, args.pretty)?;
            writeln!(writer)?;
        }
        ReportFormat::Yaml => yaml::export_report_yaml(&report, &mut writer)?,
        ReportFormat::Csv => csv::export_allocations_csv(&report.allocations, &tree, &mut writer)?,
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Report written to: {}", path.display());
    }

    Ok(())
}
