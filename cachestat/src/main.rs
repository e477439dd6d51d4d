use anyhow::{bail, Context, Result};
use cachestat::cli::{AnalyzeArgs, Command};
use cachestat::simulate::write_samples;
use cachestat::{
    write_ecdf_csv, Analyzer, Cli, Config, Mean, Reporter, Simulator, Statistic,
    TerminalReporter,
};
use clap::Parser;
use log::{debug, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Load config and apply CLI overrides
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config);
    debug!("Configuration: {:?}", config);

    match &cli.command {
        Command::Analyze(args) => analyze(&config, args),
        Command::Simulate(_) => simulate(&config),
    }
}

fn analyze(config: &Config, args: &AnalyzeArgs) -> Result<()> {
    let analyzer = Analyzer::from_config(&config.bootstrap);
    info!(
        "Analyzing {} groups with {} resamples at {} confidence",
        config.groups.len(),
        config.bootstrap.resamples,
        config.bootstrap.confidence_level
    );

    let reports = analyzer.run(&config.groups, args.group_dir.as_deref());

    if let Some(dir) = &args.ecdf_dir {
        for summary in reports.iter().filter_map(|r| r.summary()) {
            if let Some(path) = write_ecdf_csv(dir, summary)? {
                info!("Wrote empirical CDF to {}", path.display());
            }
        }
    }

    let reporter: Box<dyn Reporter> = match args.json_reporter() {
        Some(json) => Box::new(json),
        None if args.no_color => Box::new(TerminalReporter::without_colors()),
        None => Box::new(TerminalReporter::new()),
    };
    reporter.report(&reports)?;

    let failed = reports.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        bail!("{} of {} groups failed", failed, reports.len());
    }
    Ok(())
}

fn simulate(config: &Config) -> Result<()> {
    let mut simulator = Simulator::from_config(&config.simulation, &config.cache)
        .context("Failed to set up the cache simulator")?;

    info!(
        "Simulating {} accesses per group (address space = {})",
        config.simulation.trials, config.cache.address_space_size
    );
    let groups = simulator
        .run_all(config.simulation.trials)
        .context("Simulation failed")?;

    for group in &groups {
        let path = config.simulation.output_dir.join(&group.spec.path);
        write_samples(&path, &group.samples)?;

        let data: Vec<f64> = group.samples.iter().map(|&s| s as f64).collect();
        info!(
            "{}: mean {:.6} cycles -> {}",
            group.spec.label,
            Mean.evaluate(&data),
            path.display()
        );
    }

    let thresholds: Vec<String> = groups
        .iter()
        .map(|g| format!("{} = {}", g.spec.label, g.spec.worst_case))
        .collect();
    if groups
        .iter()
        .zip(&config.groups)
        .any(|(g, configured)| g.spec.worst_case != configured.worst_case)
    {
        warn!(
            "Configured worst-case thresholds differ from the cache model ({})",
            thresholds.join(", ")
        );
    }

    Ok(())
}
