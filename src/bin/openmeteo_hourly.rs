// Downloads hourly temperature, precipitation and wind for five Wroclaw points from the
// Open-Meteo archive and writes them to an NDJSON file, one calendar year per request.
use weather_etl::{ArchiveFetcher, EtlError, FetcherConfig};

#[tokio::main]
async fn main() -> Result<(), EtlError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let fetcher = ArchiveFetcher::new(FetcherConfig::from_defaults()?).await?;
    let report = fetcher.run().await?;

    println!(
        "Wrote {} hourly records ({} requests) to {}",
        report.records,
        report.chunks,
        report.output.display()
    );
    Ok(())
}
