//! Run the retrograde analysis to its fixed point.
//!
//! Usage:
//!   gobb_analyze              resume from the latest stored generation
//!   gobb_analyze -i           start from scratch
//!   gobb_analyze -g 7 -d out  resume from generation 7, data in ./out
//!   gobb_analyze -s           store a snapshot after every generation

use std::env;
use std::process;

use anyhow::{bail, Context, Result};

use gobb_analyzer::data::MAX_GENERATION;
use gobb_analyzer::{AnalysisFileStore, Analyzer, Generation, IoMode};

fn print_help() {
    println!("Usage: gobb_analyze [OPTION...]");
    println!("Options:");
    println!("  -d DIR      store analysis data files in DIR (default: .)");
    println!("  -g NUM      resume analysis from the NUM'th generation");
    println!("              (default: the latest generation stored)");
    println!("  -i          start analysis initially");
    println!("  -s          store analysis data to a file every generation");
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
    data_dir: String,
    generation: Option<Generation>,
    initial: bool,
    store_every: bool,
}

/// Parse the command line. `Ok(None)` means --help/--version handled the
/// invocation.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options {
        data_dir: ".".to_string(),
        generation: None,
        initial: false,
        store_every: false,
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
        } else if let Some(value) = take_option_value(args, &mut index, 'd')? {
            options.data_dir = value;
        } else if let Some(value) = take_option_value(args, &mut index, 'g')? {
            let generation: Generation = value
                .parse()
                .ok()
                .filter(|&g| g <= MAX_GENERATION)
                .with_context(|| format!("invalid generation '{}'", value))?;
            options.generation = Some(generation);
        } else if arg == "-i" {
            options.initial = true;
            index += 1;
        } else if arg == "-s" {
            options.store_every = true;
            index += 1;
        } else {
            bail!("invalid option '{}'", arg);
        }
    }

    if index < args.len() {
        bail!("too many arguments");
    }
    if options.generation.is_some() && options.initial {
        bail!("'-g' and '-i' options are conflicted");
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
    let io_mode = if options.store_every {
        IoMode::StoreEveryGenerations
    } else {
        IoMode::StoreFinalGeneration
    };

    let store = AnalysisFileStore::new(&options.data_dir);
    let mut analyzer = Analyzer::new();

    if options.initial {
        analyzer.start(&store, io_mode)?;
    } else if let Some(generation) = options.generation {
        analyzer.resume(&store, io_mode, generation)?;
    } else {
        analyzer.resume_latest(&store, io_mode)?;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("gobb_analyze");

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
        log::error!("{:#}", err);
        process::exit(1);
    }
}
