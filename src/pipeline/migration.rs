use crate::config::MigrationConfig;
use crate::constants::OUTPUT_FILE_PREFIX;
use crate::error::Result;
use crate::pipeline::dedupe::dedupe_with_order;
use crate::pipeline::mapper::map_record;
use crate::pipeline::normalize::clean_record;
use crate::types::{MappedRecord, StudentRecord};
use chrono::NaiveDate;
use metrics::counter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// In-memory result of dedupe, clean, map and filter.
#[derive(Debug, Clone)]
pub struct MigrationBatch {
    pub total_rows: usize,
    pub unique_rows: usize,
    pub records: Vec<MappedRecord>,
}

impl MigrationBatch {
    pub fn rejected_rows(&self) -> usize {
        self.unique_rows - self.records.len()
    }

    /// Row count per deal stage, ordered by stage name.
    pub fn stage_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.deal_stage.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Result of a complete migration run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub run_id: Uuid,
    pub total_rows: usize,
    pub unique_rows: usize,
    pub valid_rows: usize,
    pub rejected_rows: usize,
    pub stage_counts: BTreeMap<String, usize>,
    pub output_path: PathBuf,
}

pub struct StudentMigration {
    config: MigrationConfig,
}

impl StudentMigration {
    pub fn new(config: MigrationConfig) -> Self {
        Self { config }
    }

    /// Dedupe, normalize, map, then drop rows whose email did not survive
    /// normalization.
    pub fn process(&self, records: Vec<StudentRecord>) -> MigrationBatch {
        let total_rows = records.len();
        let unique = dedupe_with_order(records, self.config.date_order);
        let unique_rows = unique.len();
        debug!("{} unique students after dedupe", unique_rows);

        let records: Vec<MappedRecord> = unique
            .into_iter()
            .map(|r| clean_record(r, &self.config.default_country_code))
            .map(|r| map_record(&r))
            .filter(|m| !m.email.is_empty())
            .collect();

        MigrationBatch { total_rows, unique_rows, records }
    }

    pub fn output_path(&self, run_date: NaiveDate) -> PathBuf {
        Path::new(&self.config.output_dir)
            .join(format!("{OUTPUT_FILE_PREFIX}{}.csv", run_date.format("%Y%m%d")))
    }

    #[instrument(skip(self), fields(input = %self.config.input_path))]
    pub fn run(&self, run_date: NaiveDate) -> Result<MigrationReport> {
        let run_id = Uuid::new_v4();
        info!(%run_id, "Starting student migration");

        let records = read_students(Path::new(&self.config.input_path))?;
        info!("Found {} total records", records.len());

        let batch = self.process(records);
        let output_path = self.output_path(run_date);
        fs::create_dir_all(&self.config.output_dir)?;
        write_mapped(&output_path, &batch.records)?;

        counter!("handoff_students_exported_total").increment(batch.records.len() as u64);
        counter!("handoff_students_rejected_total").increment(batch.rejected_rows() as u64);
        info!(
            "Migration complete: {} of {} unique students written to {}",
            batch.records.len(),
            batch.unique_rows,
            output_path.display()
        );

        Ok(MigrationReport {
            run_id,
            total_rows: batch.total_rows,
            unique_rows: batch.unique_rows,
            valid_rows: batch.records.len(),
            rejected_rows: batch.rejected_rows(),
            stage_counts: batch.stage_counts(),
            output_path,
        })
    }
}

/// Reads the spreadsheet export. Missing columns and empty cells become `None`.
pub fn read_students(path: &Path) -> Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<StudentRecord>, _>>()?;
    Ok(records)
}

pub fn write_mapped(path: &Path, records: &[MappedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        // serde only emits the header alongside the first row
        writer.write_record([
            "Email",
            "First Name",
            "Last Name",
            "Phone Number",
            "Student ID",
            "Enrollment Status",
            "Course Name",
            "Enrollment Date",
            "Deal Stage",
        ])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
