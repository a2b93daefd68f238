//! Command-line argument parsing.

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("Usage: tabsolve [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Table to solve (cells separated by '|')");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <CELL=VALUE>    Set a cell before solving (can be repeated)");
    eprintln!("  -o, --output <FILE>       Export the solved table (.md for Markdown)");
    eprintln!("  -w, --write               Save the solved table back to FILE");
    eprintln!("  -c, --command <EXPR>      Evaluate a numeric expression and exit");
    eprintln!("  --size <COLSxROWS>        Size of a new table (default: 4x4)");
    eprintln!("  --kinds                   Also print the kind of every cell");
    eprintln!("  --config <FILE>           Load settings from TOML file");
    eprintln!("  --no-color                Disable coloured output");
    eprintln!("  -h, --help                Print help");
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub file: Option<PathBuf>,
    pub sets: Vec<(String, String)>,
    pub output: Option<PathBuf>,
    pub write: bool,
    pub command: Option<String>,
    pub cols: usize,
    pub rows: usize,
    pub kinds: bool,
    pub config_file: Option<PathBuf>,
    pub no_color: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            file: None,
            sets: Vec::new(),
            output: None,
            write: false,
            command: None,
            cols: 4,
            rows: 4,
            kinds: false,
            config_file: None,
            no_color: false,
        }
    }
}

/// What the command line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Run(Args),
}

/// Parse arguments, excluding the program name.
pub fn parse_args(argv: &[String]) -> Result<Invocation> {
    let mut args = Args::default();

    let mut i = 0;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-s" | "--set" => {
                let value = next_value(argv, &mut i, "--set", "a CELL=VALUE pair")?;
                let Some((cell, input)) = value.split_once('=') else {
                    bail!("--set expects CELL=VALUE, got '{}'", value);
                };
                args.sets.push((cell.trim().to_string(), input.to_string()));
            }
            "-o" | "--output" => {
                let value = next_value(argv, &mut i, "--output", "a file path")?;
                args.output = Some(PathBuf::from(value));
            }
            "-w" | "--write" => args.write = true,
            "-c" | "--command" => {
                let value = next_value(argv, &mut i, "--command", "an expression")?;
                args.command = Some(value.to_string());
            }
            "--size" => {
                let value = next_value(argv, &mut i, "--size", "COLSxROWS")?;
                let (cols, rows) = parse_size(value)?;
                args.cols = cols;
                args.rows = rows;
            }
            "--kinds" => args.kinds = true,
            "--config" => {
                let value = next_value(argv, &mut i, "--config", "a file path")?;
                args.config_file = Some(PathBuf::from(value));
            }
            "--no-color" => args.no_color = true,
            arg if arg.starts_with('-') && arg.len() > 1 => {
                bail!("Unknown option: {}", arg);
            }
            _ => {
                if args.file.is_none() {
                    args.file = Some(PathBuf::from(&argv[i]));
                } else {
                    bail!("Unexpected argument: {}", argv[i]);
                }
            }
        }
        i += 1;
    }

    if args.write && args.file.is_none() {
        bail!("--write requires a FILE");
    }

    Ok(Invocation::Run(args))
}

fn next_value<'a>(argv: &'a [String], i: &mut usize, flag: &str, what: &str) -> Result<&'a str> {
    *i += 1;
    match argv.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires {}", flag, what),
    }
}

/// Parse `COLSxROWS`, e.g. `4x10`.
fn parse_size(value: &str) -> Result<(usize, usize)> {
    let lower = value.to_ascii_lowercase();
    let Some((cols, rows)) = lower.split_once('x') else {
        bail!("--size expects COLSxROWS, got '{}'", value);
    };
    let cols: usize = cols
        .trim()
        .parse()
        .with_context(|| format!("Invalid column count in '{}'", value))?;
    let rows: usize = rows
        .trim()
        .parse()
        .with_context(|| format!("Invalid row count in '{}'", value))?;
    if cols == 0 || rows == 0 {
        bail!("Row or column count can't be non-positive");
    }
    Ok((cols, rows))
}
