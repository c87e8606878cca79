//! Runs the station-CSV aggregation end to end: discover exports, read the rows of one
//! station from each, reduce them to monthly documents and write a JSON array.
//!
//! Files are processed best-effort. A file that cannot be read, decoded or parsed is
//! recorded as [`FileStatus::Failed`] and left out of the merge; the run only produces
//! no output when no file contributed any rows.

use crate::config::AggregatorConfig;
use crate::station_csv::aggregate::{aggregate_monthly, build_monthly_documents, MonthlyDocument};
use crate::station_csv::error::StationCsvError;
use crate::station_csv::reader::{discover_csv_files, read_station_rows};
use crate::types::record::{MonthlyRecord, WeatherRecord};
use crate::utils::write_pretty_json;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// What happened to a single input file.
#[derive(Debug)]
pub enum FileStatus {
    /// The file contributed `rows` daily rows of the target station.
    Loaded { rows: usize },
    /// The file holds no rows of the target station.
    Skipped,
    /// The file could not be processed and was left out.
    Failed(StationCsvError),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Summary of one aggregation run.
#[derive(Debug)]
pub struct AggregationReport {
    pub files: Vec<FileOutcome>,
    /// The monthly documents, sorted by timestamp. Empty when nothing was loaded.
    pub documents: Vec<WeatherRecord>,
    /// Months whose precipitation sum counted at least one missing day as zero.
    pub months_with_missing_precipitation: usize,
    /// Where the documents were written, `None` if no file contributed data.
    pub output: Option<PathBuf>,
}

impl AggregationReport {
    pub fn loaded_files(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Loaded { .. }))
    }

    pub fn skipped_files(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Skipped))
    }

    pub fn failed_files(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Failed(_)))
    }

    /// Timestamps of the first and last document.
    pub fn date_span(&self) -> Option<(&str, &str)> {
        let first = self.documents.first()?;
        let last = self.documents.last()?;
        Some((first.timestamp.as_str(), last.timestamp.as_str()))
    }

    fn count(&self, predicate: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.status)).count()
    }
}

pub struct StationCsvAggregator {
    config: AggregatorConfig,
}

impl StationCsvAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Reads every matching export and returns the per-file outcomes together with
    /// the monthly documents, without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`StationCsvError::InputDirRead`] if the input folder cannot be listed and
    /// [`StationCsvError::DataFrameProcessing`] if the merged rows cannot be aggregated.
    /// Errors of individual files end up in their [`FileOutcome`] instead.
    pub fn collect(&self) -> Result<(Vec<FileOutcome>, Vec<MonthlyDocument>), StationCsvError> {
        let files = discover_csv_files(&self.config)?;
        info!(
            "Processing station {}: found {} CSV files in {}",
            self.config.station_code,
            files.len(),
            self.config.input_dir.display()
        );

        let mut outcomes = Vec::with_capacity(files.len());
        let mut frames = Vec::new();
        for path in files {
            let status = match read_station_rows(&path, &self.config) {
                Ok(Some(rows)) => {
                    info!("[OK] {} -> {} days", display_name(&path), rows.height());
                    let status = FileStatus::Loaded { rows: rows.height() };
                    frames.push(rows);
                    status
                }
                Ok(None) => {
                    info!("[SKIP] {} has no rows for this station", display_name(&path));
                    FileStatus::Skipped
                }
                Err(e) => {
                    warn!("[ERROR] Problem with file {}: {}", path.display(), e);
                    FileStatus::Failed(e)
                }
            };
            outcomes.push(FileOutcome { path, status });
        }

        if frames.is_empty() {
            return Ok((outcomes, Vec::new()));
        }

        let monthly = aggregate_monthly(frames)?;
        let documents = build_monthly_documents(&monthly, &self.config.site)?;
        Ok((outcomes, documents))
    }

    /// Aggregates the exports and writes the monthly documents to `config.output_path`.
    ///
    /// When no file yields usable rows nothing is written and the report's `output` is `None`.
    pub fn run(&self) -> Result<AggregationReport, StationCsvError> {
        let (files, documents) = self.collect()?;

        let months_with_missing_precipitation = documents
            .iter()
            .filter(|doc| doc.missing_precipitation_days > 0)
            .count();
        if months_with_missing_precipitation > 0 {
            warn!(
                "{} months have missing precipitation days counted as 0 mm",
                months_with_missing_precipitation
            );
        }
        let calendar: Option<Vec<MonthlyRecord>> = self
            .config
            .calendar_fields
            .then(|| documents.iter().map(MonthlyDocument::to_monthly_record).collect());
        let documents: Vec<WeatherRecord> = documents.into_iter().map(|doc| doc.record).collect();

        let mut report = AggregationReport {
            files,
            documents,
            months_with_missing_precipitation,
            output: None,
        };

        if report.documents.is_empty() {
            warn!("No station data could be processed, no output written");
            return Ok(report);
        }

        let output_path = &self.config.output_path;
        match &calendar {
            Some(monthly) => write_pretty_json(output_path, monthly),
            None => write_pretty_json(output_path, &report.documents),
        }
        .map_err(|e| StationCsvError::OutputWrite(output_path.clone(), e))?;
        info!("Wrote {}", output_path.display());
        info!("Monthly records: {}", report.documents.len());
        if let Some((first, last)) = report.date_span() {
            info!("Date range: {} to {}", first, last);
        }
        report.output = Some(output_path.clone());
        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station_csv::test_support::synop_row;
    use crate::types::location::strachowice_station;
    use std::fs;

    const STATION: i64 = 351160424;

    fn aggregator_for(dir: &Path) -> StationCsvAggregator {
        StationCsvAggregator::new(
            AggregatorConfig::builder()
                .input_dir(dir)
                .output_path(dir.join("monthly.json"))
                .station_code(STATION)
                .site(strachowice_station())
                .build(),
        )
    }

    #[test]
    fn test_end_to_end_january_2020() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let matching = [
            synop_row(STATION, 2020, 1, 1, "1.0", "0.5", "10"),
            synop_row(STATION, 2020, 1, 2, "2.0", "0.5", "20"),
            synop_row(STATION, 2020, 1, 3, "3.0", "0.5", "30"),
        ];
        fs::write(dir.path().join("s_d_2020_01.csv"), matching.join("\n"))?;
        fs::write(
            dir.path().join("s_d_2020_02.csv"),
            synop_row(350150500, 2020, 1, 1, "50.0", "50.0", "50"),
        )?;

        let aggregator = aggregator_for(dir.path());
        let report = aggregator.run()?;

        assert_eq!(report.loaded_files(), 1);
        assert_eq!(report.skipped_files(), 1);
        assert_eq!(report.failed_files(), 0);
        assert_eq!(report.documents.len(), 1);

        let written = fs::read_to_string(report.output.as_ref().expect("output written"))?;
        let docs: Vec<serde_json::Value> = serde_json::from_str(&written)?;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["timestamp"], "2020-01-01T00:00:00Z");
        assert_eq!(docs[0]["location"], "Wroclaw_Strachowice");
        assert_eq!(docs[0]["source"], "imgw-pib");
        assert_eq!(docs[0]["temperature_2m"], 2.0);
        assert_eq!(docs[0]["precipitation"], 1.5);
        assert_eq!(docs[0]["wind_speed_10m"], 20.0);
        assert!(written.starts_with("[\n    {\n        \"timestamp\""));
        Ok(())
    }

    #[test]
    fn test_broken_file_does_not_abort_run() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("s_d_a.csv"), "351160424,\"X\",2020\n")?;
        fs::write(
            dir.path().join("s_d_b.csv"),
            [
                synop_row(STATION, 2021, 6, 1, "18.0", "0.0", "2.0"),
                synop_row(STATION, 2021, 5, 1, "12.0", "1.0", "4.0"),
            ]
            .join("\n"),
        )?;

        let report = aggregator_for(dir.path()).run()?;
        assert_eq!(report.failed_files(), 1);
        assert_eq!(report.loaded_files(), 1);
        assert!(matches!(
            report.files[0].status,
            FileStatus::Failed(StationCsvError::MissingColumn { .. })
        ));
        assert_eq!(
            report.date_span(),
            Some(("2021-05-01T00:00:00Z", "2021-06-01T00:00:00Z"))
        );
        Ok(())
    }

    #[test]
    fn test_no_usable_data_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("s_d_2020.csv"),
            synop_row(350150500, 2020, 1, 1, "1.0", "1.0", "1"),
        )?;

        let aggregator = aggregator_for(dir.path());
        let report = aggregator.run()?;
        assert!(report.output.is_none());
        assert!(report.documents.is_empty());
        assert!(!aggregator.config().output_path.exists());
        Ok(())
    }

    #[test]
    fn test_missing_precipitation_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("s_d_2020.csv"),
            [
                synop_row(STATION, 2020, 3, 1, "4.0", "", "2.0"),
                synop_row(STATION, 2020, 3, 2, "6.0", "2.5", "4.0"),
                synop_row(STATION, 2020, 4, 1, "9.0", "0.0", "3.0"),
            ]
            .join("\n"),
        )?;

        let report = aggregator_for(dir.path()).run()?;
        assert_eq!(report.months_with_missing_precipitation, 1);
        assert_eq!(report.documents[0].precipitation, Some(2.5));
        Ok(())
    }

    #[test]
    fn test_missing_input_folder_processes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let aggregator = aggregator_for(&dir.path().join("imgw_dane"));

        let report = aggregator.run()?;
        assert!(report.files.is_empty());
        assert!(report.output.is_none());
        Ok(())
    }

    #[test]
    fn test_calendar_fields_in_output() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(
            dir.path().join("s_d_2022.csv"),
            synop_row(STATION, 2022, 8, 1, "21.0", "3.0", "2.0"),
        )?;
        let aggregator = StationCsvAggregator::new(
            AggregatorConfig::builder()
                .input_dir(dir.path())
                .output_path(dir.path().join("monthly.json"))
                .station_code(STATION)
                .site(strachowice_station())
                .calendar_fields(true)
                .build(),
        );

        let report = aggregator.run()?;
        let written = fs::read_to_string(report.output.as_ref().expect("output written"))?;
        let docs: Vec<serde_json::Value> = serde_json::from_str(&written)?;
        assert_eq!(docs[0]["timestamp"], "2022-08-01T00:00:00Z");
        assert_eq!(docs[0]["year"], 2022);
        assert_eq!(docs[0]["month"], 8);
        assert_eq!(docs[0]["temperature_2m"], 21.0);
        assert_eq!(report.documents[0].timestamp, "2022-08-01T00:00:00Z");
        Ok(())
    }
}
