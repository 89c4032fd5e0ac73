use crate::report::types::Report;
use std::io::Write;
use tracing::instrument;

/// Generate a json report of the candidates.
#[instrument(skip_all, level = "trace")]
pub fn report<W: Write>(report: &Report, writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::reference_and_narrow;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    #[test]
    fn test_report() {
        let mut buffer = vec![];
        report(&reference_and_narrow(), &mut buffer).unwrap();
        let json: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(Value::from(30), json["encoding"]["jitter"]);
        assert_eq!(Value::from("within-connection"), json["encoding"]["scope"]);
        assert!(json.get("capacity").is_none());
        let narrow = &json["candidates"][0];
        assert_eq!(Value::from(3), narrow["hop_multiplier"]);
        assert_eq!(Value::from(false), narrow["ok"]);
        assert_eq!(Value::from(2450), narrow["total_collisions"]);
        assert_eq!(Value::from(-27), narrow["gap"]);
        assert_eq!(3, narrow["collisions"].as_array().unwrap().len());
        let first = &narrow["collisions"][0];
        assert_eq!(Value::from(191), first["lower"]["wire_min"]);
        assert_eq!(Value::from(224), first["upper"]["wire_max"]);
        let reference = &json["candidates"][1];
        assert_eq!(Value::from(true), reference["ok"]);
        assert_eq!(Value::from(20), reference["gap"]);
        assert_eq!(6, reference["spacing"].as_array().unwrap().len());
        assert_eq!(Value::from(238), reference["spacing"][0]["wire_min"]);
    }
}
