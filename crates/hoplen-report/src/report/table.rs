use crate::report::types::{Candidate, Report};
use comfy_table::presets::{ASCII_MARKDOWN, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};
use tracing::instrument;

/// Generate a Markdown table report of the candidates.
#[instrument(skip_all, level = "trace")]
pub fn report_md(report: &Report) {
    println!("{}", render(report, ASCII_MARKDOWN));
}

/// Generate a pretty table report of the candidates.
#[instrument(skip_all, level = "trace")]
pub fn report_pretty(report: &Report) {
    println!("{}", render(report, UTF8_FULL));
}

fn render(report: &Report, preset: &str) -> String {
    let encoding = &report.encoding;
    let mut sections = vec![format!(
        "overhead {}-{} bytes (jitter {}), ttl {}-{}, {} connection buckets, {}",
        encoding.overhead_min,
        encoding.overhead_max,
        encoding.jitter,
        encoding.first_ttl,
        encoding.max_ttl,
        encoding.connection_buckets,
        encoding.scope
    )];
    sections.push(summary_table(report, preset).to_string());
    for candidate in &report.candidates {
        sections.push(render_candidate(candidate, preset));
    }
    if let Some(warning) = report
        .capacity
        .as_ref()
        .and_then(|capacity| capacity.warning.as_ref())
    {
        sections.push(format!("warning: {warning}"));
    }
    sections.join("\n\n")
}

fn summary_table(report: &Report, preset: &str) -> Table {
    let columns = vec!["Hop Mult", "Gap", "Probes", "Collisions", "Cross", "Result"];
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns);
    for candidate in &report.candidates {
        let gap = candidate
            .gap
            .map_or_else(|| String::from("-"), |gap| gap.to_string());
        let result = if candidate.ok { "ok" } else { "COLLIDES" };
        table.add_row(vec![
            candidate.hop_multiplier.to_string(),
            gap,
            candidate.probes.to_string(),
            candidate.total_collisions.to_string(),
            candidate.cross_connection_collisions.to_string(),
            String::from(result),
        ]);
    }
    table
}

fn render_candidate(candidate: &Candidate, preset: &str) -> String {
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if candidate.ok {
        table.set_header(vec!["TTL", "Wire Min", "Wire Max"]);
        for spacing in &candidate.spacing {
            table.add_row(vec![
                spacing.ttl.to_string(),
                spacing.wire_min.to_string(),
                spacing.wire_max.to_string(),
            ]);
        }
        format!(
            "hop multiplier {}: no collisions across {} probes\n{table}",
            candidate.hop_multiplier, candidate.probes
        )
    } else {
        table.set_header(vec!["Conn", "TTL", "Wire", "Conn", "TTL", "Wire"]);
        for pair in &candidate.collisions {
            table.add_row(vec![
                pair.lower.connection.to_string(),
                pair.lower.ttl.to_string(),
                format!("{}-{}", pair.lower.wire_min, pair.lower.wire_max),
                pair.upper.connection.to_string(),
                pair.upper.ttl.to_string(),
                format!("{}-{}", pair.upper.wire_min, pair.upper.wire_max),
            ]);
        }
        let more = match candidate.remaining() {
            0 => String::new(),
            remaining => format!("\n... and {remaining} more"),
        };
        format!(
            "hop multiplier {}: {} collisions\n{table}{more}",
            candidate.hop_multiplier, candidate.total_collisions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::reference_and_narrow;
    use test_case::test_case;

    #[test_case(UTF8_FULL; "pretty")]
    #[test_case(ASCII_MARKDOWN; "markdown")]
    fn test_render(preset: &str) {
        let output = render(&reference_and_narrow(), preset);
        assert!(output.starts_with(
            "overhead 80-110 bytes (jitter 30), ttl 1-30, 10 connection buckets, within-connection"
        ));
        assert!(output.contains("COLLIDES"));
        assert!(output.contains("hop multiplier 3: 2450 collisions"));
        assert!(output.contains("191-221"));
        assert!(output.contains("194-224"));
        assert!(output.contains("... and 2447 more"));
        assert!(output.contains(
            "hop multiplier 50: no collisions across 300 probes"
        ));
        assert!(output.contains("1688"));
        assert!(!output.contains("warning"));
    }

    #[test]
    fn test_render_markdown_header() {
        let output = render(&reference_and_narrow(), ASCII_MARKDOWN);
        assert!(output.contains("| Hop Mult |"));
    }
}
