//! campaign-sheet CLI - expand new campaign tables into campaign, ad and keyword tables

use anyhow::{bail, Context, Result};
use campaign_sheet::{build_scaffold, process_data, Criteria, Sheet, SheetValues, TargetResource};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "campaign-sheet")]
#[command(version)]
#[command(about = "Expand new campaign station pairs into campaign, ad and keyword tables", long_about = None)]
struct Cli {
    /// Table to build: campaign, ad or keyword
    #[arg(short, long)]
    resource: TargetResource,

    /// Template sheet values (JSON)
    #[arg(short, long)]
    template: PathBuf,

    /// New campaign sheet values (JSON)
    #[arg(short, long)]
    new_campaign: PathBuf,

    /// Campaigns × ad groups scaffold sheet values (JSON), required for ads and keywords
    #[arg(short, long, conflicts_with_all = ["campaigns_template", "ad_groups_template"])]
    scaffold: Option<PathBuf>,

    /// Campaigns template used to build the scaffold
    #[arg(long, requires = "ad_groups_template")]
    campaigns_template: Option<PathBuf>,

    /// Ad groups template used to build the scaffold
    #[arg(long, requires = "campaigns_template")]
    ad_groups_template: Option<PathBuf>,

    /// Criteria file (JSON) overriding the default columns and limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty print the output
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let criteria = load_criteria(cli.config.as_deref())?;
    let template = read_values(&cli.template)?;
    let new_campaign = read_values(&cli.new_campaign)?;
    let scaffold = load_scaffold(cli)?;

    let processed = process_data(&template, &new_campaign, &scaffold, cli.resource, &criteria)
        .with_context(|| format!("Failed to build {} table", cli.resource))?;
    if processed.issues_present {
        tracing::warn!(resource = %cli.resource, "output contains rows with issues, see the Issues column");
    }
    write_values(&processed, cli.output.as_deref(), cli.pretty)
}

fn load_criteria(path: Option<&Path>) -> Result<Criteria> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Criteria::from_json(&json).with_context(|| format!("Invalid criteria in {}", path.display()))
        }
        None => Ok(Criteria::default()),
    }
}

fn load_scaffold(cli: &Cli) -> Result<SheetValues> {
    if cli.resource == TargetResource::Campaign {
        return Ok(SheetValues::default());
    }
    match (&cli.scaffold, &cli.campaigns_template, &cli.ad_groups_template) {
        (Some(scaffold), _, _) => read_values(scaffold),
        (None, Some(campaigns), Some(ad_groups)) => {
            let scaffold = build_scaffold(&read_sheet(campaigns)?, &read_sheet(ad_groups)?)
                .context("Failed to build campaigns and ad groups scaffold")?;
            Ok(SheetValues::from(&scaffold))
        }
        _ => bail!(
            "Building {} requires --scaffold or both --campaigns-template and --ad-groups-template",
            cli.resource
        ),
    }
}

fn read_values(path: &Path) -> Result<SheetValues> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid sheet values in {}", path.display()))
}

fn read_sheet(path: &Path) -> Result<Sheet> {
    let values = read_values(path)?;
    Sheet::from_values(values.values).with_context(|| format!("Invalid sheet in {}", path.display()))
}

fn write_values(values: &SheetValues, path: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(values)?
    } else {
        serde_json::to_string(values)?
    };
    json.push('\n');
    match path {
        Some(path) => fs::write(path, json).with_context(|| format!("Failed to write {}", path.display())),
        None => {
            io::stdout().write_all(json.as_bytes())?;
            Ok(())
        }
    }
}
