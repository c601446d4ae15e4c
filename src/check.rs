//! Threshold classification and worst-of-N result aggregation.

use std::process;

use crate::{perfdata, ServiceState, TablespaceUsage, ThresholdPair};

/// Body used when no reading violates a threshold. Also the "no tablespaces
/// found" output, which supervisors rely on being an OK line.
pub const ALL_HEALTHY: &str = "All Tablespaces are Healthy";

/// Classifies a single value against a threshold pair.
///
/// Both bounds are inclusive: a value exactly at the warning threshold is
/// WARNING, exactly at the critical threshold is CRITICAL. Never returns
/// Unknown; that state is reserved for collection failures reported by the
/// driver.
pub fn classify(value: f64, thresholds: &ThresholdPair) -> ServiceState {
    if value >= thresholds.critical {
        ServiceState::Critical
    } else if value >= thresholds.warning {
        ServiceState::Warning
    } else {
        ServiceState::Ok
    }
}

/// A reading that crossed a threshold, together with the severity it reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    pub reading: TablespaceUsage,
    pub state: ServiceState,
}

/// The finished result of one check run: overall state, the violating
/// readings in discovery order and the single status line to print.
///
/// Building an `Evaluation` has no side effects; printing and terminating
/// happen in [`Evaluation::print_and_exit`] at the process boundary, exactly
/// once per invocation.
#[derive(Clone, Debug)]
pub struct Evaluation {
    state: ServiceState,
    violations: Vec<Violation>,
    output: String,
}

impl Evaluation {
    /// Builds an evaluation carrying only a state and a message body, for
    /// results that have no readings behind them (connection probes, driver
    /// errors).
    pub fn from_message(state: ServiceState, body: &str) -> Evaluation {
        Evaluation {
            state,
            violations: Vec::new(),
            output: format!("{} - {}", state, body),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The complete status line, including the perfdata section.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    /// Prints the status line to stdout and exits with the mapped code.
    pub fn print_and_exit(self) -> ! {
        println!("{}", self.output);
        process::exit(self.state.exit_code());
    }
}

/// Evaluates tablespace capacity readings against a percent-used threshold
/// pair, aggregating to a single worst-of-N state.
///
/// ```rust
/// # use check_oracle::{ServiceState, TablespaceCheck, TablespaceUsage, ThresholdPair};
/// let check = TablespaceCheck::new(ThresholdPair::new(70.0, 90.0))
///     .with_reading(TablespaceUsage::new("USERS", 750.0, 75.0, 1000.0));
/// let evaluation = check.evaluate();
/// assert_eq!(evaluation.state(), ServiceState::Warning);
/// assert_eq!(
///     evaluation.output(),
///     "WARNING - USERS (75.00>70) | USERS=750.00MB;700.00;900.00;0;1000.00"
/// );
/// ```
pub struct TablespaceCheck {
    thresholds: ThresholdPair,
    readings: Vec<TablespaceUsage>,
}

impl TablespaceCheck {
    pub fn new(thresholds: ThresholdPair) -> TablespaceCheck {
        TablespaceCheck {
            thresholds,
            readings: Vec::new(),
        }
    }

    /// Pushes a single reading into the check.
    pub fn push(&mut self, reading: TablespaceUsage) {
        self.readings.push(reading);
    }

    pub fn with_reading(mut self, reading: TablespaceUsage) -> TablespaceCheck {
        self.push(reading);
        self
    }

    pub fn with_readings<I>(mut self, readings: I) -> TablespaceCheck
    where
        I: IntoIterator<Item = TablespaceUsage>,
    {
        self.readings.extend(readings);
        self
    }

    pub fn readings(&self) -> &[TablespaceUsage] {
        &self.readings
    }

    /// Classifies every reading in input order and folds the results into one
    /// evaluation.
    ///
    /// Later, worse classifications override earlier, better ones; the
    /// violation list keeps discovery order. An empty reading list yields OK
    /// with the healthy sentinel. Perfdata carries one token per reading,
    /// violating or not.
    pub fn evaluate(&self) -> Evaluation {
        let mut state = ServiceState::Ok;
        let mut violations = Vec::new();
        let mut body = String::new();

        for reading in &self.readings {
            let reading_state = classify(reading.used_pct, &self.thresholds);
            if reading_state == ServiceState::Ok {
                continue;
            }

            let crossed = match reading_state {
                ServiceState::Critical => self.thresholds.critical,
                _ => self.thresholds.warning,
            };
            body.push_str(&format!(
                "{} ({:.2}>{}) ",
                reading.name, reading.used_pct, crossed
            ));
            violations.push(Violation {
                reading: reading.clone(),
                state: reading_state,
            });
            state = state.max(reading_state);
        }

        if violations.is_empty() {
            body.push_str(ALL_HEALTHY);
        }

        let output = format!(
            "{} - {}| {}",
            state,
            body,
            perfdata::capacity_tokens(&self.readings, &self.thresholds)
        );

        Evaluation {
            state,
            violations,
            output,
        }
    }
}

/// Evaluates a single absolute session count against a threshold pair.
///
/// `label` is the human part of the message, `perf_label` the perfdata label:
/// `Active sessions` / `sessions` for the whole database, `SCOTT: used
/// sessions` / `SCOTT_sessions` for a per-user count.
pub struct SessionCheck {
    label: String,
    perf_label: String,
    count: i64,
    thresholds: ThresholdPair,
}

impl SessionCheck {
    /// A count of all sessions in the instance.
    pub fn database(count: i64, thresholds: ThresholdPair) -> SessionCheck {
        SessionCheck {
            label: "Active sessions".to_owned(),
            perf_label: "sessions".to_owned(),
            count,
            thresholds,
        }
    }

    /// A count of the sessions held by one database user.
    pub fn for_user(username: &str, count: i64, thresholds: ThresholdPair) -> SessionCheck {
        SessionCheck {
            label: format!("{}: used sessions", username),
            perf_label: format!("{}_sessions", username),
            count,
            thresholds,
        }
    }

    pub fn evaluate(&self) -> Evaluation {
        let state = classify(self.count as f64, &self.thresholds);
        let output = format!(
            "{} - {} {}|{}",
            state,
            self.label,
            self.count,
            perfdata::count_token(&self.perf_label, self.count, &self.thresholds)
        );
        Evaluation {
            state,
            violations: Vec::new(),
            output,
        }
    }
}
