//! Export helpers for CSV telemetry and JSON run summaries.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Path that sends an export to stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

/// Open a buffered sink for a telemetry or summary export.
///
/// Missing parent directories are created so runs can write into fresh
/// output trees.
pub fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == STDOUT_PATH {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)?,
        _ => {}
    }
    File::create(path).map(|file| Box::new(BufWriter::new(file)) as Box<dyn Write>)
}

pub mod telemetry {
    use std::io::Write;

    use serde::Serialize;

    use crate::ExportError;

    /// One CSV row per controller tick.
    #[derive(Debug, Clone, Serialize)]
    pub struct Row<'a> {
        pub time_s: f64,
        pub phase: &'a str,
        pub control_mode: &'a str,
        pub error: &'a str,
        pub x_m: f64,
        pub y_m: f64,
        pub z_m: f64,
        pub vx_m_s: f64,
        pub vy_m_s: f64,
        pub vz_m_s: f64,
        pub ax_m_s2: f64,
        pub ay_m_s2: f64,
        pub az_m_s2: f64,
        /// Empty when no target is selected.
        pub distance_m: Option<f64>,
        pub thrust_n: f64,
        pub fuel_used_kg: f64,
        pub power_delivered_kw: f64,
        pub soc: f64,
        pub fuel_kg: f64,
    }

    /// Write all rows with a header line.
    pub fn write_rows<W: Write>(writer: W, rows: &[Row<'_>]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for row in rows {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub mod summary {
    use std::io::Write;

    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    #[derive(Debug, Clone, Serialize)]
    pub struct PhaseEntry<'a> {
        pub time_s: f64,
        pub phase: &'a str,
        pub distance_m: Option<f64>,
    }

    /// End-of-run summary.
    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary<'a> {
        pub completed: bool,
        pub final_phase: &'a str,
        pub elapsed_s: f64,
        pub dt_s: f64,
        pub target_pos: Option<[f64; 3]>,
        pub target_mass_kg: Option<f64>,
        pub captured_mass_kg: Option<f64>,
        pub soc: f64,
        pub fuel_kg: f64,
        pub phases: Vec<PhaseEntry<'a>>,
    }

    #[derive(Serialize)]
    struct Envelope<'a> {
        generated_at: String,
        #[serde(flatten)]
        summary: &'a RunSummary<'a>,
    }

    /// Write the summary as pretty JSON, stamped with the current UTC time.
    pub fn write_summary<W: Write>(writer: W, summary: &RunSummary<'_>) -> Result<(), ExportError> {
        let envelope = Envelope {
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
        };
        to_writer_pretty(writer, &envelope)?;
        Ok(())
    }
}
