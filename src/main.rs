//! Wireplan - wire lengths for electrical cabinets

mod cli;
mod config;

use anyhow::{Context, anyhow};
use std::env;
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wireplan_core::{
    CsvSheet, MappingStore, MappingTable, Session, apply_standard_measurements,
    find_unmapped_references, process_all,
};
use wireplan_engine::engine::{ComponentClass, Coord, Endpoint, Grid, GridConfig};

use cli::{Cli, Command, EndpointArg, Options};
use config::Config;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            cli::print_usage();
            return ExitCode::from(2);
        }
    };
    if cli.command == Command::Help {
        cli::print_usage();
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.options.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = effective_config(&cli.options)?;

    match cli.command {
        Command::Help => {}
        Command::Route { from, to } => {
            let grid = Grid::from_config(config.grid)?;
            let start = endpoint(&grid, from)?;
            let end = endpoint(&grid, to)?;
            let m = wireplan_engine::engine::measure(&grid, start, end)?;
            let path: Vec<String> = m.path.iter().map(Coord::to_string).collect();
            println!("{} mm", m.distance);
            println!("{}", path.join(" -> "));
        }
        Command::Distance {
            sheet,
            origin,
            destination,
        } => {
            let session = open_session(&config, &sheet)?;
            match session.resolve_connection(&origin, &destination) {
                Ok(connection) => println!("{} mm", connection.distance),
                Err(reason) => {
                    println!("Unresolvable: {}", reason);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Measure { sheet } => {
            let session = open_session(&config, &sheet)?;
            let mut csv = CsvSheet::open(&sheet)?;
            let report = process_all(&session, &mut csv);
            csv.save()?;
            println!(
                "Measured {} connections ({} unresolved, {} failed)",
                report.processed, report.unresolved, report.failed
            );
        }
        Command::Standard { sheet } => {
            if config.standard.is_empty() {
                eprintln!("Warning: no standard measurements configured");
            }
            let mut csv = CsvSheet::open(&sheet)?;
            let report = apply_standard_measurements(&mut csv, &config.standard);
            csv.save()?;
            println!(
                "Applied standard measurements to {} rows ({} failed)",
                report.processed, report.failed
            );
        }
        Command::Unmapped { sheet } => {
            let session = open_session(&config, &sheet)?;
            let csv = CsvSheet::open(&sheet)?;
            let report = find_unmapped_references(session.mappings(), &csv);
            for reference in &report.unmapped {
                println!("{}", reference);
            }
            println!(
                "{} of {} references unmapped",
                report.unmapped.len(),
                report.total
            );
        }
        Command::MapAdd {
            sheet,
            reference,
            coord,
            description,
            bottom,
        } => {
            let mut session = open_session(&config, &sheet)?;
            if !session.grid().contains(coord) {
                eprintln!(
                    "Warning: {} is not a cell of the {} grid",
                    coord,
                    shape(config.grid)
                );
            }
            let description = description.unwrap_or_else(|| {
                ComponentClass::of(&reference)
                    .suggested_description()
                    .to_string()
            });
            session
                .mappings_mut()
                .add(&reference, coord, &description, bottom)
                .with_context(|| format!("mapping for {} kept in memory only", reference))?;
            println!("Mapped {} -> {}", reference, coord);
        }
        Command::MapRemove { sheet, reference } => {
            let mut session = open_session(&config, &sheet)?;
            if session.mappings_mut().remove(&reference)? {
                println!("Removed {}", reference);
            } else {
                println!("No mapping for {}", reference);
            }
        }
        Command::MapList { sheet } => {
            let session = open_session(&config, &sheet)?;
            for mapping in session.mappings().iter() {
                let side = if mapping.default_to_bottom { "back" } else { "front" };
                println!(
                    "{}\t{}\t{}\t{}",
                    mapping.key,
                    mapping.coord(),
                    side,
                    mapping.description
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Config file values with command-line overrides applied.
fn effective_config(options: &Options) -> anyhow::Result<Config> {
    let (mut config, warnings) = config::load_config(options.config.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let grid = GridConfig::new(
        options.sections.unwrap_or(config.grid.sections),
        options.rows.unwrap_or(config.grid.rows),
        options.cols.unwrap_or(config.grid.cols),
    );
    config.grid = config::check_grid(grid).map_err(|e| anyhow!(e))?;
    if let Some(dir) = &options.mappings_dir {
        config.mappings_dir = Some(dir.clone());
    }
    debug!(
        grid = %shape(config.grid),
        mappings_dir = ?config.mappings_dir,
        rules = config.standard.len(),
        "configuration resolved"
    );
    Ok(config)
}

fn open_session(config: &Config, sheet: &Path) -> anyhow::Result<Session> {
    let grid = Grid::from_config(config.grid)?;
    let store = MappingStore::for_document(sheet, config.mappings_dir.as_deref());
    let (mappings, warnings) = MappingTable::open(store);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    Ok(Session::new(grid, mappings))
}

fn endpoint(grid: &Grid, arg: EndpointArg) -> anyhow::Result<Endpoint> {
    match arg {
        EndpointArg::Cell(coord) => Ok(Endpoint::Cell(coord)),
        EndpointArg::Special { section, kind } => grid
            .special_point(section, kind)
            .map(Endpoint::Special)
            .ok_or_else(|| {
                anyhow!(
                    "No {} in section {} of the {} grid",
                    kind,
                    section + 1,
                    shape(grid.config())
                )
            }),
    }
}

fn shape(config: GridConfig) -> String {
    format!("{}x{}x{}", config.sections, config.rows, config.cols)
}
