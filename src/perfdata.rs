//! Performance data rendering.
//!
//! Tokens follow the nagios plugin convention `label=value[UOM];warn;crit;min[;max]`
//! and are appended to the status line after a literal `| ` separator. The
//! grammar is parsed by the supervisor and has to stay bit-exact.

use crate::{TablespaceUsage, ThresholdPair};

/// Makes a label safe for the perfdata section.
///
/// `=` would split the token, so it is replaced; single quotes are doubled
/// and labels containing spaces are quoted.
pub fn sanitize_label(label: &str) -> String {
    let name = label.replace('=', "_").replace('\'', "''");

    if name.contains(' ') {
        format!("'{}'", name)
    } else {
        name
    }
}

/// One capacity token. Warning and critical are projected from percentages to
/// absolute megabytes so graphing tools can draw them against the value.
pub fn capacity_token(reading: &TablespaceUsage, thresholds: &ThresholdPair) -> String {
    format!(
        "{}={:.2}MB;{:.2};{:.2};0;{:.2}",
        sanitize_label(&reading.name),
        reading.used_mb,
        reading.total_mb * thresholds.warning / 100.0,
        reading.total_mb * thresholds.critical / 100.0,
        reading.total_mb
    )
}

/// Capacity tokens for a whole reading list, space joined. Every reading gets
/// a token, not only the violating ones.
pub fn capacity_tokens(readings: &[TablespaceUsage], thresholds: &ThresholdPair) -> String {
    readings
        .iter()
        .map(|reading| capacity_token(reading, thresholds))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token for an absolute count check. Thresholds render in their given unit.
pub fn count_token(label: &str, count: i64, thresholds: &ThresholdPair) -> String {
    format!(
        "{}={};{};{}",
        sanitize_label(label),
        count,
        thresholds.warning,
        thresholds.critical
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_label() {
        let test_data = [
            ("sessions", "sessions"),
            ("test=a", "test_a"),
            ("te'st", "te''st"),
            ("te st", "'te st'"),
        ];
        for (label, expected) in &test_data {
            assert_eq!(&sanitize_label(label), expected);
        }
    }

    #[test]
    fn test_capacity_token() {
        let reading = TablespaceUsage::new("USERS", 450.0, 45.0, 1000.0);
        let thresholds = ThresholdPair::new(70.0, 90.0);
        assert_eq!(
            capacity_token(&reading, &thresholds),
            "USERS=450.00MB;700.00;900.00;0;1000.00"
        );
    }

    #[test]
    fn test_capacity_tokens_space_joined() {
        let readings = vec![
            TablespaceUsage::new("USERS", 450.0, 45.0, 1000.0),
            TablespaceUsage::new("TEMP", 100.0, 50.0, 200.0),
        ];
        let thresholds = ThresholdPair::new(70.0, 90.0);
        assert_eq!(
            capacity_tokens(&readings, &thresholds),
            "USERS=450.00MB;700.00;900.00;0;1000.00 TEMP=100.00MB;140.00;180.00;0;200.00"
        );
    }

    #[test]
    fn test_capacity_tokens_empty() {
        assert_eq!(capacity_tokens(&[], &ThresholdPair::new(70.0, 90.0)), "");
    }

    #[test]
    fn test_count_token() {
        let thresholds = ThresholdPair::new(100.0, 150.0);
        assert_eq!(count_token("sessions", 120, &thresholds), "sessions=120;100;150");
    }

    #[test]
    fn test_count_token_fractional_thresholds() {
        let thresholds = ThresholdPair::new(99.5, 150.0);
        assert_eq!(
            count_token("sessions", 120, &thresholds),
            "sessions=120;99.5;150"
        );
    }
}
