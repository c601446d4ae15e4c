//! The check_oracle crate implements the threshold evaluation and result
//! aggregation engine behind the `check_oracle` Nagios/Icinga plugin.
//!
//! The engine itself does no I/O: a driver collects readings from the
//! database, hands them to a [`TablespaceCheck`] or [`SessionCheck`] and
//! receives an [`Evaluation`], which it prints and exits with at the outer
//! boundary.
//!
//! ```rust
//! use check_oracle::{classify, ServiceState, TablespaceCheck, TablespaceUsage, ThresholdPair};
//!
//! let thresholds = ThresholdPair::new(70.0, 90.0);
//! assert_eq!(classify(45.0, &thresholds), ServiceState::Ok);
//!
//! let check = TablespaceCheck::new(thresholds)
//!     .with_reading(TablespaceUsage::new("USERS", 450.0, 45.0, 1000.0));
//! let evaluation = check.evaluate();
//! assert_eq!(evaluation.state(), ServiceState::Ok);
//! assert_eq!(evaluation.exit_code(), 0);
//!
//! // A driver would finish with `evaluation.print_and_exit()`.
//! ```

use std::fmt;

mod check;
pub mod icinga;
pub mod perfdata;
mod runner;

pub use crate::check::{classify, Evaluation, SessionCheck, TablespaceCheck, Violation};
pub use crate::runner::{safe_run, Runner, RunnerResult};

/// Represents a service state from nagios.
///
/// States order by severity, so `a.max(b)` yields the worse of the two. This
/// is what drives the worst-of-N aggregation in [`TablespaceCheck::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl ServiceState {
    /// Returns the corresponding nagios exit code to signal the service state.
    ///
    /// The mapping is depended upon by the monitoring supervisor and must
    /// never change.
    pub fn exit_code(self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warning => 1,
            ServiceState::Critical => 2,
            ServiceState::Unknown => 3,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warning => "WARNING",
            ServiceState::Critical => "CRITICAL",
            ServiceState::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// The warning and critical bounds a reading is compared against, in the same
/// unit as the metric being checked: percent used for tablespace checks,
/// absolute counts for session checks.
///
/// The evaluator does not insist on `warning < critical`; it classifies
/// against whatever bounds the operator configured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdPair {
    pub fn new(warning: f64, critical: f64) -> ThresholdPair {
        ThresholdPair { warning, critical }
    }

    /// Parses a threshold pair from the raw command line strings.
    ///
    /// A non-numeric value is an error, never a silent default; the driver
    /// reports it as UNKNOWN.
    pub fn parse(warning: &str, critical: &str) -> Result<ThresholdPair, ThresholdError> {
        let warning = warning
            .trim()
            .parse()
            .map_err(|_| ThresholdError::Warning(warning.to_owned()))?;
        let critical = critical
            .trim()
            .parse()
            .map_err(|_| ThresholdError::Critical(critical.to_owned()))?;
        Ok(ThresholdPair { warning, critical })
    }
}

/// A malformed threshold argument.
#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    #[error("invalid warning threshold '{0}': not a number")]
    Warning(String),
    #[error("invalid critical threshold '{0}': not a number")]
    Critical(String),
}

/// One capacity reading for a single tablespace at evaluation time.
///
/// `used_pct` is the quantity compared against the thresholds; `used_mb` and
/// `total_mb` only feed message and perfdata rendering. Never mutated after
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TablespaceUsage {
    pub name: String,
    pub used_mb: f64,
    pub used_pct: f64,
    pub total_mb: f64,
}

impl TablespaceUsage {
    pub fn new(name: &str, used_mb: f64, used_pct: f64, total_mb: f64) -> TablespaceUsage {
        TablespaceUsage {
            name: name.to_owned(),
            used_mb,
            used_pct,
            total_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ServiceState, TablespaceUsage, ThresholdPair};

    #[test]
    fn test_state_exit_codes() {
        assert_eq!(ServiceState::Ok.exit_code(), 0);
        assert_eq!(ServiceState::Warning.exit_code(), 1);
        assert_eq!(ServiceState::Critical.exit_code(), 2);
        assert_eq!(ServiceState::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(&ServiceState::Ok.to_string(), "OK");
        assert_eq!(&ServiceState::Warning.to_string(), "WARNING");
        assert_eq!(&ServiceState::Critical.to_string(), "CRITICAL");
        assert_eq!(&ServiceState::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_state_severity_ordering() {
        assert!(ServiceState::Ok < ServiceState::Warning);
        assert!(ServiceState::Warning < ServiceState::Critical);
        assert!(ServiceState::Critical < ServiceState::Unknown);

        assert_eq!(
            ServiceState::Warning.max(ServiceState::Critical),
            ServiceState::Critical
        );
        assert_eq!(ServiceState::Ok.max(ServiceState::Ok), ServiceState::Ok);
    }

    #[test]
    fn test_threshold_parse() {
        let pair = ThresholdPair::parse("70", "90").unwrap();
        assert_eq!(pair.warning, 70.0);
        assert_eq!(pair.critical, 90.0);

        let pair = ThresholdPair::parse(" 82.5 ", "95.5").unwrap();
        assert_eq!(pair.warning, 82.5);
        assert_eq!(pair.critical, 95.5);
    }

    #[test]
    fn test_threshold_parse_rejects_garbage() {
        let err = ThresholdPair::parse("abc", "90").unwrap_err();
        assert!(err.to_string().contains("warning"));
        assert!(err.to_string().contains("abc"));

        let err = ThresholdPair::parse("70", "").unwrap_err();
        assert!(err.to_string().contains("critical"));
    }

    #[test]
    fn test_tablespace_usage_construction() {
        let r = TablespaceUsage::new("USERS", 450.0, 45.0, 1000.0);
        assert_eq!(r.name, "USERS");
        assert_eq!(r.used_mb, 450.0);
        assert_eq!(r.used_pct, 45.0);
        assert_eq!(r.total_mb, 1000.0);
    }
}
