use anyhow::Context;
use clap::Parser;
use output::writer::{append_log, write_json};
use std::path::PathBuf;
use tipscore::dataset::parse_smoker;
use tipscore::{Dataset, Day, Gender, Service};
use workflow::config::FilterConfig;
use workflow::runner::Runner;

mod output;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless restaurant tipping report")]
struct Args {
    /// CSV with total_bill,tip,sex,smoker,day,time,size columns (defaults to the bundled data)
    #[arg(long)]
    data: Option<PathBuf>,
    /// Load filter selections from YAML
    #[arg(long)]
    filter: Option<PathBuf>,
    #[arg(long)]
    bill_min: Option<f64>,
    #[arg(long)]
    bill_max: Option<f64>,
    #[arg(long)]
    size_min: Option<u32>,
    #[arg(long)]
    size_max: Option<u32>,
    /// Food service to keep (Lunch, Dinner); repeatable
    #[arg(long = "service")]
    services: Vec<Service>,
    /// Gender to keep (Male, Female); repeatable
    #[arg(long = "gender")]
    genders: Vec<Gender>,
    /// Smoker status to keep (Yes, No); repeatable
    #[arg(long = "smoker", value_parser = parse_smoker)]
    smokers: Vec<bool>,
    /// Day to keep (Thur, Fri, Sat, Sun); repeatable
    #[arg(long = "day")]
    days: Vec<Day>,
    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Append a one-line summary to this log file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = match &args.data {
        Some(path) => Dataset::from_path(path)
            .with_context(|| format!("loading dataset {}", path.display()))?,
        None => Dataset::bundled().context("loading bundled dataset")?,
    };

    let file_config = match &args.filter {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };
    let config = file_config.merge(FilterConfig::from_args(
        args.bill_min,
        args.bill_max,
        args.size_min,
        args.size_max,
        args.services,
        args.genders,
        args.smokers,
        args.days,
    ));

    let model = Runner::new(config).execute(dataset)?;
    for line in model.summary_lines() {
        println!("{line}");
    }

    if let Some(path) = &args.json {
        write_json(path, &model)?;
        log::info!("report written to {}", path.display());
    }
    if let Some(path) = &args.log {
        append_log(path, &model)?;
    }

    Ok(())
}
