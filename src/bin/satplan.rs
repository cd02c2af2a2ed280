use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use env_logger::Env;

use satplan::config::PlanConfig;
use satplan::SatPlanError;

/// Plan satellite observations from a ground observatory.
#[derive(Parser, Debug)]
#[command(name = "satplan", version, about)]
struct Cli {
    /// Run configuration (TOML).
    config: Utf8PathBuf,

    /// Worker threads, overrides `run.workers` of the configuration.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Do not print the summary table.
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: &Cli) -> Result<(), SatPlanError> {
    let mut config = PlanConfig::from_path(&cli.config)?;
    if cli.workers.is_some() {
        config.run.workers = cli.workers;
    }

    let plan = config.resolve()?;
    let catalog = config.load_catalog()?;
    let objects = config.objects(&catalog)?;

    let report = plan.planner().plan(&catalog, &objects)?;
    let written = config.writer().write(&report)?;

    if !cli.quiet {
        println!("{}", report.summary().with_limit(50));
        println!("detailed table: {}", written.detailed);
        println!("simple table:   {}", written.simple);
        println!("failed list:    {}", written.failed);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("satplan: {e}");
            ExitCode::FAILURE
        }
    }
}
