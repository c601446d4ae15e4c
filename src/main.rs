use anyhow::{bail, Context};
use clap::CommandFactory;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use check_oracle::{
    icinga, Evaluation, Runner, ServiceState, SessionCheck, TablespaceCheck, ThresholdPair,
};

mod cli;
mod queries;

use crate::cli::{CheckMode, Cli};

fn main() {
    if let Err(err) = icinga::print_command_config_if_env_and_exit("check_oracle", &Cli::command())
    {
        eprintln!("failed to generate icinga command configuration: {err}");
        std::process::exit(ServiceState::Unknown.exit_code());
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            std::process::exit(ServiceState::Ok.exit_code());
        }
        Err(err) => {
            // clap's own exit code is 2, which a supervisor reads as CRITICAL.
            let _ = err.print();
            std::process::exit(ServiceState::Unknown.exit_code());
        }
    };

    init_tracing(cli.debug);

    Runner::new()
        .safe_run(|| run(&cli).map_err(|err| format!("{:#}", err)))
        .print_and_exit()
}

/// Log to stderr only; stdout carries nothing but the status line.
fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "check_oracle=debug"
    } else {
        "check_oracle=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<Evaluation> {
    if cli.mode() == CheckMode::TnsListener {
        return Ok(tns_listener_check(cli));
    }

    let thresholds = thresholds(cli)?;
    let conn = queries::connect(&cli.host, cli.port, &cli.instance, &cli.user, &cli.password)
        .context("unable to connect to database")?;

    let evaluation = match cli.mode() {
        CheckMode::Tablespace(name) if name.eq_ignore_ascii_case("ALL") => {
            let readings = queries::all_tablespaces(&conn)?;
            TablespaceCheck::new(thresholds)
                .with_readings(readings)
                .evaluate()
        }
        CheckMode::Tablespace(name) => {
            // A missing tablespace is a configuration problem, not a full one.
            let reading = queries::tablespace(&conn, name)?
                .with_context(|| format!("tablespace {} not found", name))?;
            TablespaceCheck::new(thresholds)
                .with_reading(reading)
                .evaluate()
        }
        CheckMode::Sessions(user) if user.eq_ignore_ascii_case("ALL") => {
            SessionCheck::database(queries::session_count(&conn)?, thresholds).evaluate()
        }
        CheckMode::Sessions(user) => {
            let count = queries::user_session_count(&conn, user)?;
            SessionCheck::for_user(user, count, thresholds).evaluate()
        }
        CheckMode::TnsListener => unreachable!("handled above"),
    };

    conn.close()?;
    Ok(evaluation)
}

fn thresholds(cli: &Cli) -> anyhow::Result<ThresholdPair> {
    match (&cli.warning, &cli.critical) {
        (Some(warning), Some(critical)) => Ok(ThresholdPair::parse(warning, critical)?),
        _ => bail!("warning and critical thresholds are required for this check"),
    }
}

/// Connection probe. Unlike the metric checks, an unreachable listener is the
/// failure this check exists to detect, so it reports CRITICAL rather than
/// UNKNOWN.
fn tns_listener_check(cli: &Cli) -> Evaluation {
    match queries::connect(&cli.host, cli.port, &cli.instance, &cli.user, &cli.password) {
        Ok(conn) => {
            let banner = conn
                .server_version()
                .map(|(_, banner)| banner)
                .unwrap_or_else(|_| "Oracle".to_owned());
            Evaluation::from_message(ServiceState::Ok, &format!("Connected to {}", banner))
        }
        Err(err) => Evaluation::from_message(
            ServiceState::Critical,
            &format!("Unable to connect to database - {}", err),
        ),
    }
}
