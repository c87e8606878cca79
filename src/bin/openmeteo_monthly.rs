// Rolls the hourly NDJSON written by `openmeteo_hourly` up into monthly documents per point.
use weather_etl::{run_rollup, EtlError, RollupConfig};

fn main() -> Result<(), EtlError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RollupConfig::default();
    let rollups = run_rollup(&config)?;
    println!(
        "Wrote {} monthly records to {}",
        rollups.len(),
        config.output_path.display()
    );
    Ok(())
}
