//! Conversion of simulation reports into export records.

use std::io::Write;

use capture_export::ExportError;
use capture_export::summary::{self, PhaseEntry, RunSummary};
use capture_export::telemetry::{self, Row};
use capture_mission::{MissionReport, TickSample};

fn row(sample: &TickSample) -> Row<'_> {
    let t = &sample.telemetry;
    let p = sample.state.position_m;
    let v = sample.state.velocity_m_s;
    let a = sample.acceleration;
    Row {
        time_s: sample.time_s,
        phase: t.phase.as_str(),
        control_mode: t.control_mode.map(|m| m.as_str()).unwrap_or(""),
        error: t.error.map(|e| e.as_str()).unwrap_or(""),
        x_m: p[0],
        y_m: p[1],
        z_m: p[2],
        vx_m_s: v[0],
        vy_m_s: v[1],
        vz_m_s: v[2],
        ax_m_s2: a[0],
        ay_m_s2: a[1],
        az_m_s2: a[2],
        distance_m: t.distance_m,
        thrust_n: t.thrust_magnitude_n(),
        fuel_used_kg: t.fuel_used_kg,
        power_delivered_kw: t.power_delivered_kw,
        soc: t.soc,
        fuel_kg: t.fuel_kg,
    }
}

/// Write one CSV row per simulated tick.
pub fn write_telemetry_csv<W: Write>(writer: W, report: &MissionReport) -> Result<(), ExportError> {
    let rows: Vec<Row<'_>> = report.samples.iter().map(row).collect();
    telemetry::write_rows(writer, &rows)
}

/// Write the end-of-run JSON summary.
pub fn write_summary_json<W: Write>(
    writer: W,
    report: &MissionReport,
    dt_s: f64,
) -> Result<(), ExportError> {
    let phases = report
        .phases
        .iter()
        .map(|e| PhaseEntry {
            time_s: e.time_s,
            phase: e.phase.as_str(),
            distance_m: e.distance_m,
        })
        .collect();
    let run = RunSummary {
        completed: report.completed(),
        final_phase: report.final_phase.as_str(),
        elapsed_s: report.elapsed_s,
        dt_s,
        target_pos: report.target.as_ref().map(|t| t.pos),
        target_mass_kg: report.target.as_ref().map(|t| t.mass_kg),
        captured_mass_kg: report.captured_mass_kg,
        soc: report.soc,
        fuel_kg: report.fuel_kg,
        phases,
    };
    summary::write_summary(writer, &run)
}
