use thiserror::Error;

use crate::resolve::Role;

/// Terminal failures of the chart pipeline.
///
/// Every variant aborts rendering; the runtime reports it through the same
/// output surface the chart would have used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("Data source loaded but contains no rows")]
    EmptySource,

    #[error(
        "Missing required columns for {}. Found columns: {}",
        format_roles(missing),
        found.join(", ")
    )]
    UnresolvedColumns { missing: Vec<Role>, found: Vec<String> },

    #[error(
        "After filtering missing values, there are 0 rows left to plot \
         ({total} rows were read). Check the data for blanks or non-numeric values"
    )]
    NoPlottableRows { total: usize },
}

fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_lists_roles_and_columns() {
        let err = ChartError::UnresolvedColumns {
            missing: vec![Role::Size, Role::Color],
            found: vec!["a".to_string(), "b".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("size (bill length)"));
        assert!(msg.contains("color (species)"));
        assert!(msg.contains("Found columns: a, b"));
    }

    #[test]
    fn test_no_rows_distinct_from_empty_source() {
        let empty = ChartError::EmptySource.to_string();
        let filtered = ChartError::NoPlottableRows { total: 3 }.to_string();
        assert_ne!(empty, filtered);
        assert!(filtered.contains("0 rows left"));
        assert!(filtered.contains("3 rows were read"));
    }
}
