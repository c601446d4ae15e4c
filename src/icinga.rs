//! Icinga2 `CheckCommand` configuration generated from the clap definition.
//!
//! Setting the environment variable `GENERATE_ICINGA_COMMAND` makes the
//! plugin print a ready-to-import command object instead of running a check.

use std::process;

#[derive(Debug, thiserror::Error)]
pub enum IcingaConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid executable path")]
    InvalidExecutablePath,
}

/// Renders the `CheckCommand` object for the given clap command, with one
/// custom variable per long option.
pub fn command_config(name: &str, command: &clap::Command) -> Result<String, IcingaConfigError> {
    let current_exe = std::env::current_exe()?
        .to_str()
        .ok_or(IcingaConfigError::InvalidExecutablePath)?
        .to_owned();

    let var_prefix = name.replace('-', "_");
    let mut out = format!("object CheckCommand \"{name}\" {{\n");
    out.push_str(&format!("  command = [ \"{current_exe}\" ]\n"));
    out.push_str("  arguments = {\n");

    let mut defaults = Vec::new();
    for arg in command.get_arguments() {
        let Some(long) = arg.get_long() else {
            continue;
        };
        if long == "help" || long == "version" {
            continue;
        }
        let variable = format!("{}_{}", var_prefix, arg.get_id().as_str().replace('-', "_"));

        out.push_str(&format!("  \"--{long}\" = {{\n"));
        if matches!(arg.get_action(), clap::ArgAction::SetTrue) {
            out.push_str(&format!("    set_if = \"${variable}$\"\n"));
        } else {
            out.push_str(&format!("    value = \"${variable}$\"\n"));
        }
        if let Some(help) = arg.get_help() {
            out.push_str(&format!(
                "    description = \"{}\"\n",
                escape_string(&help.to_string())
            ));
        }
        out.push_str("  }\n");

        if let Some(default) = arg.get_default_values().first() {
            defaults.push(format!(
                "  vars.{} = \"{}\"\n",
                variable,
                escape_string(&default.to_string_lossy())
            ));
        }
    }

    out.push_str("  }\n");
    for line in defaults {
        out.push_str(&line);
    }
    out.push_str("}\n");

    Ok(out)
}

/// Prints the command configuration and exits if `GENERATE_ICINGA_COMMAND`
/// is set. Meant to be called before argument parsing.
pub fn print_command_config_if_env_and_exit(
    name: &str,
    command: &clap::Command,
) -> Result<(), IcingaConfigError> {
    if std::env::var("GENERATE_ICINGA_COMMAND").is_err() {
        return Ok(());
    }

    println!("{}", command_config(name, command)?);
    process::exit(0);
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_command() -> clap::Command {
        clap::Command::new("check_test")
            .arg(
                clap::Arg::new("host")
                    .long("host")
                    .help("The database hostname to connect to"),
            )
            .arg(
                clap::Arg::new("port")
                    .long("port")
                    .default_value("1521"),
            )
            .arg(
                clap::Arg::new("debug")
                    .long("debug")
                    .action(clap::ArgAction::SetTrue),
            )
    }

    #[test]
    fn test_command_config() {
        let config = command_config("check_test", &test_command()).unwrap();

        assert!(config.starts_with("object CheckCommand \"check_test\" {"));
        assert!(config.contains("\"--host\" = {"));
        assert!(config.contains("value = \"$check_test_host$\""));
        assert!(config.contains("description = \"The database hostname to connect to\""));
        assert!(config.contains("set_if = \"$check_test_debug$\""));
        assert!(config.contains("vars.check_test_port = \"1521\""));
        assert!(config.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("back\\slash"), "back\\\\slash");
    }
}
