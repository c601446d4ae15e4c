use clap::Parser;

/// Nagios/Icinga check plugin for Oracle databases.
#[derive(Debug, Parser)]
#[command(name = "check_oracle", version, about)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .multiple(false)
        .args(["tablespace", "sessions", "tns_listener_check"])
))]
pub struct Cli {
    /// The database hostname to connect to
    #[arg(short = 'H', long)]
    pub host: String,

    /// The database listener port
    #[arg(short = 'P', long, default_value_t = 1521)]
    pub port: u16,

    /// The database instance name
    #[arg(short = 'I', long)]
    pub instance: String,

    /// The username you want to login as
    #[arg(short = 'u', long)]
    pub user: String,

    /// The password for the user
    #[arg(short = 'p', long)]
    pub password: String,

    /// The warning threshold: percent used for tablespace checks, a session
    /// count for session checks
    #[arg(short = 'W', long, required_unless_present = "tns_listener_check")]
    pub warning: Option<String>,

    /// The critical threshold, in the same unit as the warning threshold
    #[arg(short = 'C', long, required_unless_present = "tns_listener_check")]
    pub critical: Option<String>,

    /// The tablespace to check, pass ALL for all tablespaces
    #[arg(short = 't', long)]
    pub tablespace: Option<String>,

    /// The username for which session count to check, pass ALL to count all
    /// sessions
    #[arg(short = 's', long)]
    pub sessions: Option<String>,

    /// Check that a connection can be made to the database
    #[arg(long = "tns-listener-check")]
    pub tns_listener_check: bool,

    /// Enable debug output on stderr
    #[arg(short = 'd', long)]
    pub debug: bool,
}

/// The check selected on the command line. Exactly one per invocation,
/// enforced by the clap argument group.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckMode<'a> {
    Tablespace(&'a str),
    Sessions(&'a str),
    TnsListener,
}

impl Cli {
    pub fn mode(&self) -> CheckMode<'_> {
        if self.tns_listener_check {
            CheckMode::TnsListener
        } else if let Some(tablespace) = &self.tablespace {
            CheckMode::Tablespace(tablespace)
        } else if let Some(sessions) = &self.sessions {
            CheckMode::Sessions(sessions)
        } else {
            // The "mode" group is required, clap rejects a bare invocation.
            unreachable!("no check selected")
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec![
            "check_oracle",
            "-H",
            "db1.example.org",
            "-I",
            "ORCL",
            "-u",
            "nagios",
            "-p",
            "secret",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv)
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tablespace_mode() {
        let cli = parse(&["-W", "70", "-C", "90", "-t", "ALL"]).unwrap();
        assert_eq!(cli.mode(), CheckMode::Tablespace("ALL"));
        assert_eq!(cli.port, 1521);
        assert_eq!(cli.warning.as_deref(), Some("70"));
    }

    #[test]
    fn test_sessions_mode() {
        let cli = parse(&["-W", "100", "-C", "150", "-s", "SCOTT"]).unwrap();
        assert_eq!(cli.mode(), CheckMode::Sessions("SCOTT"));
    }

    #[test]
    fn test_tns_mode_needs_no_thresholds() {
        let cli = parse(&["--tns-listener-check"]).unwrap();
        assert_eq!(cli.mode(), CheckMode::TnsListener);
        assert!(cli.warning.is_none());
    }

    #[test]
    fn test_exactly_one_mode_required() {
        assert!(parse(&["-W", "70", "-C", "90"]).is_err());
        assert!(parse(&["-W", "70", "-C", "90", "-t", "ALL", "-s", "ALL"]).is_err());
    }

    #[test]
    fn test_thresholds_required_for_checks() {
        assert!(parse(&["-t", "ALL"]).is_err());
        assert!(parse(&["-C", "90", "-t", "ALL"]).is_err());
    }
}
