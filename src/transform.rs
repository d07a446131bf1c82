use tracing::debug;

use crate::data::{RawRecord, Value};
use crate::error::ChartError;
use crate::resolve::RoleBinding;

/// A row projected onto the four roles. Only complete, finite rows exist.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub species: String,
}

/// Project every record through the binding and keep the plottable ones.
///
/// The whole set is filtered eagerly; scale construction needs global extrema.
pub fn normalize(
    records: &[RawRecord],
    binding: &RoleBinding,
) -> Result<Vec<NormalizedRecord>, ChartError> {
    let kept: Vec<NormalizedRecord> = records
        .iter()
        .filter_map(|record| project(record, binding))
        .collect();

    debug!(
        total = records.len(),
        kept = kept.len(),
        dropped = records.len() - kept.len(),
        "normalized records"
    );

    if kept.is_empty() {
        return Err(ChartError::NoPlottableRows { total: records.len() });
    }
    Ok(kept)
}

fn project(record: &RawRecord, binding: &RoleBinding) -> Option<NormalizedRecord> {
    Some(NormalizedRecord {
        x: finite(record.get(&binding.x))?,
        y: finite(record.get(&binding.y))?,
        r: finite(record.get(&binding.size))?,
        species: label(record.get(&binding.color))?,
    })
}

fn finite(value: &Value) -> Option<f64> {
    value.as_number().filter(|n| n.is_finite())
}

fn label(value: &Value) -> Option<String> {
    match value {
        Value::Text(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if !n.is_nan() => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> RoleBinding {
        RoleBinding {
            x: "flipper_length".into(),
            y: "body_mass".into(),
            size: "bill_length".into(),
            color: "species".into(),
        }
    }

    fn row(x: Value, y: Value, r: Value, species: Value) -> RawRecord {
        RawRecord::new()
            .with("flipper_length", x)
            .with("body_mass", y)
            .with("bill_length", r)
            .with("species", species)
    }

    fn num(v: f64) -> Value {
        Value::Number(v)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    /// Feed normalized records back in as raw rows under the same binding.
    fn to_raw(records: &[NormalizedRecord]) -> Vec<RawRecord> {
        records
            .iter()
            .map(|r| {
                row(
                    num(r.x),
                    num(r.y),
                    num(r.r),
                    text(&r.species),
                )
            })
            .collect()
    }

    #[test]
    fn test_normalize_keeps_complete_rows() {
        let raw = vec![
            row(num(181.0), num(3750.0), num(39.1), text("Adelie")),
            row(num(195.0), num(3650.0), num(37.8), text("Adelie")),
        ];
        let out = normalize(&raw, &binding()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0],
            NormalizedRecord { x: 181.0, y: 3750.0, r: 39.1, species: "Adelie".into() }
        );
        assert_eq!(out[1].x, 195.0);
    }

    #[test]
    fn test_normalize_drops_null_body_mass() {
        let raw = vec![
            row(num(181.0), Value::Missing, num(39.1), text("Adelie")),
            row(num(195.0), num(3650.0), num(37.8), text("Adelie")),
        ];
        let out = normalize(&raw, &binding()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].x, 195.0);
    }

    #[test]
    fn test_normalize_drops_non_numeric_and_nan() {
        let raw = vec![
            row(text("NA"), num(1.0), num(1.0), text("Gentoo")),
            row(num(f64::NAN), num(1.0), num(1.0), text("Gentoo")),
            row(num(1.0), num(f64::INFINITY), num(1.0), text("Gentoo")),
            row(num(1.0), num(1.0), num(1.0), Value::Missing),
            row(num(2.0), num(2.0), num(2.0), text("Gentoo")),
        ];
        let out = normalize(&raw, &binding()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].species, "Gentoo");
    }

    #[test]
    fn test_normalize_absent_column_reads_missing() {
        let raw = vec![RawRecord::new().with("flipper_length", num(1.0))];
        let err = normalize(&raw, &binding()).unwrap_err();
        assert_eq!(err, ChartError::NoPlottableRows { total: 1 });
    }

    #[test]
    fn test_normalize_numeric_species_as_text() {
        let raw = vec![row(
            num(1.0),
            num(2.0),
            num(3.0),
            num(7.0),
        )];
        let out = normalize(&raw, &binding()).unwrap();
        assert_eq!(out[0].species, "7");
    }

    #[test]
    fn test_normalize_all_rows_dropped() {
        let raw = vec![
            row(Value::Missing, num(1.0), num(1.0), text("Adelie")),
            row(text("x"), num(1.0), num(1.0), text("Adelie")),
        ];
        let err = normalize(&raw, &binding()).unwrap_err();
        assert_eq!(err, ChartError::NoPlottableRows { total: 2 });
    }

    #[test]
    fn test_normalize_idempotent_and_order_preserving() {
        let raw = vec![
            row(num(210.0), num(4200.0), num(46.1), text("Gentoo")),
            row(Value::Missing, num(1.0), num(1.0), text("Adelie")),
            row(num(181.0), num(3750.0), num(39.1), text("Adelie")),
            row(num(196.0), num(3500.0), num(49.5), text("Chinstrap")),
        ];
        let first = normalize(&raw, &binding()).unwrap();
        let species: Vec<&str> = first.iter().map(|r| r.species.as_str()).collect();
        assert_eq!(species, vec!["Gentoo", "Adelie", "Chinstrap"]);

        let second = normalize(&to_raw(&first), &binding()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalized_fields_are_finite() {
        let raw = vec![
            row(num(1.0), num(f64::NEG_INFINITY), num(1.0), text("A")),
            row(num(1.5), num(2.5), num(0.5), text("B")),
            row(num(f64::NAN), num(2.0), num(3.0), text("C")),
        ];
        for rec in normalize(&raw, &binding()).unwrap() {
            assert!(rec.x.is_finite() && rec.y.is_finite() && rec.r.is_finite());
            assert!(!rec.species.is_empty());
        }
    }
}
