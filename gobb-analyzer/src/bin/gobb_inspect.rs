//! Interactively inspect a stored analysis table.
//!
//! Usage:
//!   gobb_inspect                  load the latest snapshot, start at id 0
//!   gobb_inspect -d out 12345     data in ./out, start at position 12345
//!   gobb_inspect -g 7 -C          load generation 7, no ANSI color

use std::env;
use std::io::IsTerminal;
use std::process;

use anyhow::{bail, Context, Result};

use gobb_analyzer::data::MAX_GENERATION;
use gobb_analyzer::repl::InspectShell;
use gobb_analyzer::text::AsciiRenderer;
use gobb_analyzer::{AnalysisFileStore, Generation, Inspector};
use gobb_core::{is_valid_position_id, Position, PositionId, INITIAL_POSITION_ID};

fn print_help() {
    println!("Usage: gobb_inspect [OPTION...] [POSITION-ID]");
    println!("Options:");
    println!("  -c          print pieces in color on the terminal");
    println!("  -C          do not print pieces in color on the terminal");
    println!("  -d DIR      load an analysis data file in DIR (default: .)");
    println!("  -g NUM      load the analysis data file of the NUM'th generation");
    println!("              (default: the latest generation stored)");
    println!("  --help      print this help, then exit");
    println!("  --version   print version information, then exit");
}

fn print_version() {
    println!("Gobb Analyzer version {}", env!("CARGO_PKG_VERSION"));
}

fn print_try_help(program: &str) {
    eprintln!("Try '{} --help' for more information.", program);
}

struct Options {
    color: bool,
    data_dir: String,
    generation: Option<Generation>,
    position_id: PositionId,
}

/// Parse the command line. `Ok(None)` means --help/--version handled the
/// invocation.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options {
        color: std::io::stdout().is_terminal(),
        data_dir: ".".to_string(),
        generation: None,
        position_id: INITIAL_POSITION_ID,
    };

    let mut index = 1;
    while index < args.len() {
        let arg = &args[index];
        if !arg.starts_with('-') || arg == "-" {
            break;
        }
        if arg == "--" {
            index += 1;
            break;
        }

        if arg == "--help" {
            print_help();
            return Ok(None);
        } else if arg == "--version" {
            print_version();
            return Ok(None);
        } else if arg == "-c" {
            options.color = true;
            index += 1;
        } else if arg == "-C" {
            options.color = false;
            index += 1;
        } else if let Some(value) = take_option_value(args, &mut index, 'd')? {
            options.data_dir = value;
        } else if let Some(value) = take_option_value(args, &mut index, 'g')? {
            let generation: Generation = value
                .parse()
                .ok()
                .filter(|&g| g <= MAX_GENERATION)
                .with_context(|| format!("invalid generation '{}'", value))?;
            options.generation = Some(generation);
        } else {
            bail!("invalid option '{}'", arg);
        }
    }

    if index + 1 < args.len() {
        bail!("too many arguments");
    }
    if index < args.len() {
        let value = &args[index];
        options.position_id = value
            .parse()
            .ok()
            .filter(|&id| is_valid_position_id(id))
            .with_context(|| format!("invalid position '{}'", value))?;
    }

    Ok(Some(options))
}

/// Consume `-x VALUE` or `-xVALUE` for short option `x`. Leaves `index`
/// untouched when the current argument is a different option.
fn take_option_value(args: &[String], index: &mut usize, option: char) -> Result<Option<String>> {
    let arg = &args[*index];
    let mut chars = arg.chars();
    if chars.next() != Some('-') || chars.next() != Some(option) {
        return Ok(None);
    }

    let attached: String = chars.collect();
    if !attached.is_empty() {
        *index += 1;
        return Ok(Some(attached));
    }

    let value = args
        .get(*index + 1)
        .with_context(|| format!("missing argument to option '-{}'", option))?;
    *index += 2;
    Ok(Some(value.clone()))
}

fn run(options: Options) -> Result<()> {
    let store = AnalysisFileStore::new(&options.data_dir);
    let mut inspector = Inspector::new();

    match options.generation {
        Some(generation) => inspector
            .load(&store, generation)
            .context("failed to load the analysis data file of the specified generation")?,
        None => {
            inspector
                .load_latest(&store)
                .context("failed to load an analysis data file")?;
        }
    }

    let position =
        Position::from_id(options.position_id).context("invalid position")?;
    let renderer = AsciiRenderer::new(options.color);
    let mut shell = InspectShell::new(&inspector, &renderer, position);
    shell.run()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("gobb_inspect");

    let options = match parse_args(&args) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(err) => {
            eprintln!("{}: {}", program, err);
            print_try_help(program);
            process::exit(1);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
