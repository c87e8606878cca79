// Aggregates the IMGW daily synop exports in ./imgw_dane into monthly documents
// for the Wroclaw-Strachowice station.
// Set RUST_LOG=debug for per-file details.
use weather_etl::{AggregatorConfig, EtlError, StationCsvAggregator};

fn main() -> Result<(), EtlError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let aggregator = StationCsvAggregator::new(AggregatorConfig::default());
    let report = aggregator.run()?;

    println!(
        "Files: {} loaded, {} skipped, {} failed",
        report.loaded_files(),
        report.skipped_files(),
        report.failed_files()
    );
    match &report.output {
        Some(path) => println!(
            "Wrote {} monthly records to {}",
            report.documents.len(),
            path.display()
        ),
        None => println!("No data processed, nothing written"),
    }
    Ok(())
}
