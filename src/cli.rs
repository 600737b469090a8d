//! Command-line parsing.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use wireplan_engine::engine::{Coord, SpecialKind};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("{0} requires a value")]
    MissingValue(String),

    #[error("Invalid value for {flag}: {value}")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Missing command")]
    MissingCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Wrong arguments for {0}")]
    Arity(&'static str),

    #[error("Invalid endpoint '{0}' (expected ROW,COL, door:N or motor:N)")]
    InvalidEndpoint(String),
}

/// Options accepted before or after the command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    pub sections: Option<usize>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub config: Option<PathBuf>,
    pub mappings_dir: Option<PathBuf>,
    pub verbose: bool,
}

/// A route endpoint given on the command line. Sections are stored 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointArg {
    Cell(Coord),
    Special { section: usize, kind: SpecialKind },
}

impl FromStr for EndpointArg {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidEndpoint(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let special = |rest: &str, kind| {
            rest.parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .map(|n| EndpointArg::Special {
                    section: n - 1,
                    kind,
                })
                .ok_or_else(invalid)
        };
        if let Some(rest) = lower.strip_prefix("door:") {
            return special(rest, SpecialKind::Door);
        }
        if let Some(rest) = lower.strip_prefix("motor:") {
            return special(rest, SpecialKind::Motor);
        }
        lower.parse::<Coord>().map(EndpointArg::Cell).map_err(|_| invalid())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Route {
        from: EndpointArg,
        to: EndpointArg,
    },
    Distance {
        sheet: PathBuf,
        origin: String,
        destination: String,
    },
    Measure {
        sheet: PathBuf,
    },
    Standard {
        sheet: PathBuf,
    },
    Unmapped {
        sheet: PathBuf,
    },
    MapAdd {
        sheet: PathBuf,
        reference: String,
        coord: Coord,
        description: Option<String>,
        bottom: bool,
    },
    MapRemove {
        sheet: PathBuf,
        reference: String,
    },
    MapList {
        sheet: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub options: Options,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage: wireplan [OPTIONS] <COMMAND>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  route <FROM> <TO>                 Shortest route between two grid points");
    eprintln!("  distance <SHEET> <TEXT_A> <TEXT_B>");
    eprintln!("                                    Wire length between two referenced components");
    eprintln!("  measure <SHEET>                   Fill every unmeasured row of a CSV sheet");
    eprintln!("  standard <SHEET>                  Apply the configured standard measurements");
    eprintln!("  unmapped <SHEET>                  List references in the sheet with no mapping");
    eprintln!("  map <SHEET> add <REF> <ROW,COL>   Map a reference to a grid cell");
    eprintln!("  map <SHEET> remove <REF>          Remove a mapping");
    eprintln!("  map <SHEET> list                  List the sheet's mappings");
    eprintln!();
    eprintln!("Endpoints are ROW,COL (0-based), door:N or motor:N (N is the 1-based section).");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --sections <N>            Number of cabinet sections");
    eprintln!("  --rows <N>                Rows per section");
    eprintln!("  --cols <N>                Columns per section");
    eprintln!("  --config <FILE>           Load configuration from FILE");
    eprintln!("  --mappings-dir <DIR>      Directory holding mapping tables");
    eprintln!("  --description <TEXT>      Description for `map add`");
    eprintln!("  --bottom                  Default `map add` to the back/bottom side");
    eprintln!("  -v, --verbose             Debug logging (RUST_LOG overrides)");
    eprintln!("  -h, --help                Print help");
}

/// Parse the arguments following the program name.
pub fn parse_args(args: &[String]) -> Result<Cli, CliError> {
    let mut options = Options::default();
    let mut description: Option<String> = None;
    let mut bottom = false;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => {
                return Ok(Cli {
                    options,
                    command: Command::Help,
                });
            }
            "-v" | "--verbose" => options.verbose = true,
            "--bottom" => bottom = true,
            "--sections" => options.sections = Some(number(arg, value(args, &mut i, arg)?)?),
            "--rows" => options.rows = Some(number(arg, value(args, &mut i, arg)?)?),
            "--cols" => options.cols = Some(number(arg, value(args, &mut i, arg)?)?),
            "--config" => options.config = Some(PathBuf::from(value(args, &mut i, arg)?)),
            "--mappings-dir" => {
                options.mappings_dir = Some(PathBuf::from(value(args, &mut i, arg)?))
            }
            "--description" => description = Some(value(args, &mut i, arg)?.to_string()),
            "--" => {
                positional.extend(args[i + 1..].iter().cloned());
                break;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            _ => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let command = build_command(positional, description, bottom)?;
    Ok(Cli { options, command })
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}

fn number(flag: &str, raw: &str) -> Result<usize, CliError> {
    raw.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: raw.to_string(),
    })
}

fn build_command(
    positional: Vec<String>,
    description: Option<String>,
    bottom: bool,
) -> Result<Command, CliError> {
    let mut words = positional.into_iter();
    let Some(name) = words.next() else {
        return Err(CliError::MissingCommand);
    };
    let rest: Vec<String> = words.collect();

    let command = match (name.as_str(), rest.as_slice()) {
        ("help", _) => Command::Help,
        ("route", [from, to]) => Command::Route {
            from: from.parse()?,
            to: to.parse()?,
        },
        ("route", _) => return Err(CliError::Arity("route")),
        ("distance", [sheet, origin, destination]) => Command::Distance {
            sheet: PathBuf::from(sheet),
            origin: origin.clone(),
            destination: destination.clone(),
        },
        ("distance", _) => return Err(CliError::Arity("distance")),
        ("measure", [sheet]) => Command::Measure {
            sheet: PathBuf::from(sheet),
        },
        ("measure", _) => return Err(CliError::Arity("measure")),
        ("standard", [sheet]) => Command::Standard {
            sheet: PathBuf::from(sheet),
        },
        ("standard", _) => return Err(CliError::Arity("standard")),
        ("unmapped", [sheet]) => Command::Unmapped {
            sheet: PathBuf::from(sheet),
        },
        ("unmapped", _) => return Err(CliError::Arity("unmapped")),
        ("map", [sheet, action, args @ ..]) => {
            let sheet = PathBuf::from(sheet);
            match (action.as_str(), args) {
                ("add", [reference, coord]) => Command::MapAdd {
                    sheet,
                    reference: reference.clone(),
                    coord: coord.parse().map_err(|_| CliError::InvalidValue {
                        flag: "ROW,COL".to_string(),
                        value: coord.clone(),
                    })?,
                    description,
                    bottom,
                },
                ("remove", [reference]) => Command::MapRemove {
                    sheet,
                    reference: reference.clone(),
                },
                ("list", []) => Command::MapList { sheet },
                _ => return Err(CliError::Arity("map")),
            }
        }
        ("map", _) => return Err(CliError::Arity("map")),
        (other, _) => return Err(CliError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_route_with_grid_options() {
        let cli = parse_args(&args("--sections 2 route 0,0 motor:2 --rows 5")).unwrap();
        assert_eq!(cli.options.sections, Some(2));
        assert_eq!(cli.options.rows, Some(5));
        assert_eq!(cli.options.cols, None);
        assert_eq!(
            cli.command,
            Command::Route {
                from: EndpointArg::Cell(Coord::new(0, 0)),
                to: EndpointArg::Special {
                    section: 1,
                    kind: SpecialKind::Motor
                },
            }
        );
    }

    #[test]
    fn test_endpoint_parsing() {
        assert_eq!(
            "Door:1".parse::<EndpointArg>(),
            Ok(EndpointArg::Special {
                section: 0,
                kind: SpecialKind::Door
            })
        );
        assert!("door:0".parse::<EndpointArg>().is_err());
        assert!("motor:x".parse::<EndpointArg>().is_err());
        assert!("3".parse::<EndpointArg>().is_err());
    }

    #[test]
    fn test_map_add_collects_flags() {
        let line = "map a.csv add X20:41* 2,3 --bottom --description Rail";
        let cli = parse_args(&args(line)).unwrap();
        assert_eq!(
            cli.command,
            Command::MapAdd {
                sheet: PathBuf::from("a.csv"),
                reference: "X20:41*".to_string(),
                coord: Coord::new(2, 3),
                description: Some("Rail".to_string()),
                bottom: true,
            }
        );
    }

    #[test]
    fn test_double_dash_ends_options() {
        let cli = parse_args(&args("distance a.csv -- -F1 K3")).unwrap();
        assert_eq!(
            cli.command,
            Command::Distance {
                sheet: PathBuf::from("a.csv"),
                origin: "-F1".to_string(),
                destination: "K3".to_string(),
            }
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_args(&[]), Err(CliError::MissingCommand));
        assert_eq!(
            parse_args(&args("--rows")),
            Err(CliError::MissingValue("--rows".to_string()))
        );
        assert!(matches!(
            parse_args(&args("--cols four measure a.csv")),
            Err(CliError::InvalidValue { .. })
        ));
        assert_eq!(
            parse_args(&args("--colour measure a.csv")),
            Err(CliError::UnknownOption("--colour".to_string()))
        );
        assert_eq!(
            parse_args(&args("draw a.csv")),
            Err(CliError::UnknownCommand("draw".to_string()))
        );
        assert_eq!(parse_args(&args("measure")), Err(CliError::Arity("measure")));
        assert_eq!(parse_args(&args("map a.csv list extra")), Err(CliError::Arity("map")));
    }

    #[test]
    fn test_help_anywhere() {
        assert_eq!(parse_args(&args("measure -h")).unwrap().command, Command::Help);
    }
}
