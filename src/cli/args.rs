//! Command-line argument parsing.
//!
//! Hand-rolled: the command set is small and every flag is either a bare
//! switch or takes exactly one value.

use thiserror::Error;

use crate::domain::{ConnectionType, DeviceTier};

/// Inputs for the `strategy` command. Unset fields fall back to what the
/// native platform reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyArgs {
    pub connection: Option<ConnectionType>,
    pub save_data: bool,
    pub tier: Option<DeviceTier>,
    pub width: Option<u32>,
    pub page_size: Option<usize>,
    pub reduced_motion: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Version,
    Help,
    /// Print the loading strategy for the given readings.
    Strategy(StrategyArgs),
    /// Progressively load one news category.
    News {
        category: String,
        connection: Option<ConnectionType>,
    },
    /// Search companies and remember the query.
    Search { query: String },
    /// List recent searches, or clear them.
    Recent { clear: bool },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unknown option '{flag}' for '{command}'")]
    UnknownFlag { command: &'static str, flag: String },
    #[error("option '{0}' requires a value")]
    MissingValue(String),
    #[error("invalid value '{value}' for '{flag}'")]
    InvalidValue { flag: String, value: String },
    #[error("'search' requires a query")]
    MissingQuery,
}

/// Parse command-line arguments, skipping the program name.
///
/// No arguments at all is [`CliCommand::Help`].
///
/// ```
/// use adaptive_delivery::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["adaptive-delivery".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);

    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match command.as_str() {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "strategy" => parse_strategy(args),
        "news" => parse_news(args),
        "search" => {
            let query = args.collect::<Vec<_>>().join(" ");
            if query.trim().is_empty() {
                Err(ArgsError::MissingQuery)
            } else {
                Ok(CliCommand::Search { query })
            }
        }
        "recent" => {
            let mut clear = false;
            for arg in args {
                match arg.as_str() {
                    "--clear" => clear = true,
                    _ => {
                        return Err(ArgsError::UnknownFlag {
                            command: "recent",
                            flag: arg,
                        })
                    }
                }
            }
            Ok(CliCommand::Recent { clear })
        }
        _ => Err(ArgsError::UnknownCommand(command)),
    }
}

fn parse_strategy<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut parsed = StrategyArgs::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--save-data" => parsed.save_data = true,
            "--reduced-motion" => parsed.reduced_motion = true,
            "--connection" => {
                let value = take_value(&mut args, &flag)?;
                parsed.connection = Some(ConnectionType::parse(&value));
            }
            "--tier" => {
                let value = take_value(&mut args, &flag)?;
                parsed.tier = Some(DeviceTier::parse(&value).ok_or_else(|| invalid(&flag, &value))?);
            }
            "--width" => {
                let value = take_value(&mut args, &flag)?;
                parsed.width = Some(value.parse().map_err(|_| invalid(&flag, &value))?);
            }
            "--page-size" => {
                let value = take_value(&mut args, &flag)?;
                parsed.page_size = Some(value.parse().map_err(|_| invalid(&flag, &value))?);
            }
            _ => {
                return Err(ArgsError::UnknownFlag {
                    command: "strategy",
                    flag,
                })
            }
        }
    }

    Ok(CliCommand::Strategy(parsed))
}

fn parse_news<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut category = None;
    let mut connection = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--connection" => {
                let value = take_value(&mut args, &arg)?;
                connection = Some(ConnectionType::parse(&value));
            }
            _ if arg.starts_with('-') => {
                return Err(ArgsError::UnknownFlag {
                    command: "news",
                    flag: arg,
                })
            }
            _ if category.is_none() => category = Some(arg),
            _ => {
                return Err(ArgsError::UnknownFlag {
                    command: "news",
                    flag: arg,
                })
            }
        }
    }

    Ok(CliCommand::News {
        category: category.unwrap_or_default(),
        connection,
    })
}

fn take_value<I>(args: &mut I, flag: &str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .filter(|v| !v.starts_with("--"))
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}

fn invalid(flag: &str, value: &str) -> ArgsError {
    ArgsError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}
