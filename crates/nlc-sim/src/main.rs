use clap::Parser;
use nlc_core::config::NlcConfig;
use nlc_core::observe::init_logging;
use nlc_sim::scenario::{run_comparison, ScenarioConfig};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

mod args;

fn main() -> Result<(), Box<dyn Error>> {
    let args = args::Args::parse();

    if args.example_config {
        print!("{}", NlcConfig::example_yaml());
        return Ok(());
    }

    let mut config = match args.config {
        Some(ref path) => NlcConfig::load_from(path)?,
        None => NlcConfig::load()?,
    };
    args.apply(&mut config);
    init_logging(&config.logging);

    let scenario = ScenarioConfig::from_config(&config)?;
    let beat_freq_hz = scenario.params.beat_freq_hz();
    let result = run_comparison(scenario)?;
    let summary = result.summary();
    info!(psl_advantage_db = ?summary.psl_advantage_db(), "comparison finished");

    if args.yaml {
        print!("{}", serde_yaml::to_string(&summary)?);
    } else {
        print!("{}", summary);
    }

    if let Some(ref path) = args.csv {
        let file = BufWriter::new(File::create(path)?);
        result.write_csv(file, beat_freq_hz, args.csv_span)?;
        info!(path = %path.display(), "spectra written");
    }

    Ok(())
}
