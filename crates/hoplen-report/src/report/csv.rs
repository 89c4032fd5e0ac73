use crate::report::types::{Candidate, Report};
use serde::Serialize;
use std::io::Write;
use tracing::instrument;

/// Generate a CSV report of the candidates.
#[instrument(skip_all, level = "trace")]
pub fn report<W: Write>(report: &Report, writer: W) -> anyhow::Result<()> {
    let warning = report
        .capacity
        .as_ref()
        .and_then(|capacity| capacity.warning.as_deref());
    let mut writer = csv::Writer::from_writer(writer);
    for candidate in &report.candidates {
        writer.serialize(CsvRow::new(candidate, warning))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
pub struct CsvRow {
    #[serde(rename = "HopMultiplier")]
    pub hop_multiplier: u32,
    #[serde(rename = "Ok")]
    pub ok: bool,
    #[serde(rename = "Probes")]
    pub probes: usize,
    #[serde(rename = "Collisions")]
    pub total_collisions: usize,
    #[serde(rename = "CrossConnection")]
    pub cross_connection_collisions: usize,
    #[serde(rename = "Gap")]
    pub gap: Option<i64>,
    #[serde(rename = "ClosedFormGap")]
    pub closed_form_gap: i64,
    #[serde(rename = "CapacityWarning")]
    pub capacity_warning: Option<String>,
}

impl CsvRow {
    fn new(value: &Candidate, capacity_warning: Option<&str>) -> Self {
        Self {
            hop_multiplier: value.hop_multiplier,
            ok: value.ok,
            probes: value.probes,
            total_collisions: value.total_collisions,
            cross_connection_collisions: value.cross_connection_collisions,
            gap: value.gap,
            closed_form_gap: value.closed_form_gap,
            capacity_warning: capacity_warning.map(String::from),
        }
    }
}
