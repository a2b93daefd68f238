//! tabsolve - Solve arithmetic formulas in delimited text tables.

mod cli;
mod render;

use anyhow::{Context, Result, bail};
use std::env;

use cli::{Args, Invocation};
use tabsolve_core::config::load_config;
use tabsolve_core::{Config, Document};
use tabsolve_engine::engine::{evaluate_str, format_number};

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match cli::parse_args(&argv) {
        Ok(Invocation::Help) => {
            cli::print_usage();
            return;
        }
        Ok(Invocation::Run(args)) => args,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            cli::print_usage();
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run one invocation and return the process exit code.
fn run(args: Args) -> Result<i32> {
    log::debug!("{:?}", args);
    let (config, warnings) = load_config(args.config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(expr) = &args.command {
        return Ok(run_command(expr, &config));
    }

    let color = config.color && !args.no_color;

    if let Some(path) = &args.file
        && !path.exists()
        && !args.write
    {
        bail!("Couldn't find {}", path.display());
    }

    let mut doc = Document::with_file(args.file.clone(), args.rows, args.cols, config)
        .with_context(|| match &args.file {
            Some(path) => format!("Failed to load {}", path.display()),
            None => "Failed to create table".to_string(),
        })?;

    for (cell, input) in &args.sets {
        doc.set_cell_by_name(cell, input)
            .with_context(|| format!("Failed to set {}", cell))?;
    }

    let report = doc.solve();
    for diagnostic in &report.diagnostics {
        eprintln!("{}", render::diagnostic_line(diagnostic, color));
    }
    eprintln!("{}", render::status_line(report.status, color));

    print!("{}", render::render_table(&doc, Some(&report), color));
    if args.kinds {
        print!("{}", render::render_kinds(&doc));
    }

    if let Some(output) = &args.output {
        doc.export(output)
            .with_context(|| format!("Failed to export {}", output.display()))?;
        eprintln!("Exported to {}", output.display());
    }

    if args.write {
        let path = doc.save_file().context("Failed to save table")?;
        eprintln!("Saved {}", path.display());
    }

    Ok(if report.status.is_aborted() { 1 } else { 0 })
}

/// Evaluate a numeric expression, print its value and return the exit code.
fn run_command(expr: &str, config: &Config) -> i32 {
    let body = expr.trim();
    let body = body.strip_prefix(config.marker).unwrap_or(body);
    match evaluate_str(body) {
        Ok(value) => {
            println!("{}", format_number(value, config.decimal_places));
            0
        }
        Err(e) => {
            println!("#ERR: {}", e);
            1
        }
    }
}
