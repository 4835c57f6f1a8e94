use std::path::PathBuf;

use clap::Args;

use mo_portfolio::constraints::FeasibleRegion;
use mo_portfolio::data::{load_csv, CompanyTable, LoadOptions};
use mo_portfolio::objective::{Objective, ObjectiveVector};
use mo_portfolio::{run, PortfolioError, Report, Result, SolveConfig};

/// Input table and feasible region shared by the direct commands
#[derive(Args)]
pub struct DataArgs {
    /// Path to the prepared company CSV
    #[arg(long)]
    pub data: PathBuf,

    /// Skip rows with missing values or a negative P/E instead of failing
    #[arg(long)]
    pub drop_incomplete: bool,

    /// Largest weight of any single company
    #[arg(long, default_value = "0.05")]
    pub cap: f64,

    /// Half-width of the allowed band around a portfolio beta of 1
    #[arg(long, default_value = "0.1")]
    pub beta_tolerance: f64,
}

impl DataArgs {
    fn load(&self) -> Result<CompanyTable> {
        load_csv(
            &self.data,
            &LoadOptions {
                drop_incomplete: self.drop_incomplete,
            },
        )
    }

    fn region(&self) -> Result<FeasibleRegion> {
        FeasibleRegion::new(self.cap, self.beta_tolerance)
    }
}

/// Arguments for the epsilon-constraint method
#[derive(Args)]
pub struct EpsilonArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Objective to optimize: 1 return, 2 sustainability, 3 dividend yield,
    /// 4 clean energy, 5 P/E
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub objective: u8,

    /// Comma-separated bounds for the other four objectives, in order
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, num_args = 1..)]
    pub bounds: Vec<f64>,
}

/// Arguments for the reference point method
#[derive(Args)]
pub struct ReferenceArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Comma-separated aspiration levels for all five objectives
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, num_args = 1..)]
    pub reference: Vec<f64>,

    /// Solve the payoff table rows in parallel
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for a configuration-file run
#[derive(Args)]
pub struct RunArgs {
    /// Path to the prepared company CSV
    #[arg(long)]
    pub data: PathBuf,

    /// Path to the JSON run configuration
    #[arg(long)]
    pub config: PathBuf,

    /// Skip rows with missing values or a negative P/E instead of failing
    #[arg(long)]
    pub drop_incomplete: bool,
}

pub fn run_epsilon(args: EpsilonArgs) -> Result<Report> {
    let objective = Objective::from_index(usize::from(args.objective) - 1).ok_or_else(|| {
        PortfolioError::InvalidInput(format!("objective {} is out of range", args.objective))
    })?;
    let config = SolveConfig::epsilon(objective, args.bounds).with_region(args.data.region()?);
    run(&args.data.load()?, &config)
}

pub fn run_reference(args: ReferenceArgs) -> Result<Report> {
    let reference = ObjectiveVector::from_slice(&args.reference).ok_or_else(|| {
        PortfolioError::InvalidInput(format!(
            "reference point needs 5 values, got {}",
            args.reference.len()
        ))
    })?;
    let config = SolveConfig::reference(reference)
        .with_region(args.data.region()?)
        .with_parallel(args.parallel);
    run(&args.data.load()?, &config)
}

pub fn run_config(args: RunArgs) -> Result<Report> {
    let config = SolveConfig::load(&args.config)?;
    let table = load_csv(
        &args.data,
        &LoadOptions {
            drop_incomplete: args.drop_incomplete,
        },
    )?;
    run(&table, &config)
}
