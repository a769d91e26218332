//! Arbor CLI - inspect datasets and expressions from the command line.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use arbor::data::{Dataset, Range, Scalar};
use arbor::{eval, format, parse};

/// Arbor - symbolic-expression engine tools
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a delimited dataset file
    Info {
        /// Dataset file (CSV)
        file: PathBuf,

        /// Treat the first line as data, not column names
        #[arg(long)]
        no_header: bool,
    },

    /// Parse an expression and print canonical renderings
    Parse {
        /// Infix expression, e.g. "x + y * 2"
        expression: String,

        /// Variable names the expression may reference
        #[arg(short, long, value_delimiter = ',')]
        vars: Vec<String>,

        /// Decimal digits for constants in the output
        #[arg(short, long, default_value = "6")]
        precision: usize,

        /// Print the node sequence as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Evaluate an expression over every row of a dataset
    Eval {
        /// Dataset file (CSV)
        file: PathBuf,

        /// Infix expression over the dataset's columns
        expression: String,

        /// Treat the first line as data, not column names
        #[arg(long)]
        no_header: bool,

        /// Print at most this many values (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Commands::Info { file, no_header } => info(&file, !no_header),
        Commands::Parse {
            expression,
            vars,
            precision,
            json,
        } => parse_command(&expression, &vars, precision, json),
        Commands::Eval {
            file,
            expression,
            no_header,
            limit,
        } => eval_command(&file, &expression, !no_header, limit),
    }
}

fn info(file: &Path, has_header: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ds = Dataset::from_csv_path(file, has_header)?;
    println!("{}: {} rows x {} columns", file.display(), ds.rows(), ds.cols());

    for variable in ds.variables() {
        let values = ds.values(variable.index)?;
        let min = values.iter().copied().fold(Scalar::INFINITY, Scalar::min);
        let max = values.iter().copied().fold(Scalar::NEG_INFINITY, Scalar::max);
        #[allow(clippy::cast_precision_loss)]
        let mean = values.iter().sum::<Scalar>() / values.len() as Scalar;
        println!(
            "  [{:>3}] {:<16} hash={:#018x} min={min:.6} max={max:.6} mean={mean:.6}",
            variable.index, variable.name, variable.hash
        );
    }
    Ok(())
}

fn name_maps(names: &[String]) -> (HashMap<String, u64>, HashMap<u64, String>) {
    let forward: HashMap<String, u64> = names
        .iter()
        .map(|n| (n.clone(), arbor::Variable::hash_name(n)))
        .collect();
    let backward = forward.iter().map(|(n, h)| (*h, n.clone())).collect();
    (forward, backward)
}

fn parse_command(
    expression: &str,
    vars: &[String],
    precision: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (forward, backward) = name_maps(vars);
    let tree = parse::parse(expression, &forward)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    println!("infix:  {}", format::infix(&tree, &backward, precision)?);
    println!("prefix: {}", format::prefix(&tree, &backward, precision)?);
    println!("nodes:  {}  depth: {}", tree.len(), tree.depth());
    Ok(())
}

fn eval_command(
    file: &Path,
    expression: &str,
    has_header: bool,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ds = Dataset::from_csv_path(file, has_header)?;
    let variables: HashMap<String, u64> = ds
        .variables()
        .iter()
        .map(|v| (v.name.clone(), v.hash))
        .collect();

    let tree = parse::parse(expression, &variables)?;
    let values = eval::evaluate(&tree, &ds, Range::new(0, ds.rows()))?;

    let shown = limit.unwrap_or(values.len()).min(values.len());
    for value in &values[..shown] {
        println!("{value}");
    }
    if shown < values.len() {
        println!("... ({} more)", values.len() - shown);
    }
    Ok(())
}

// Exercised end to end through the library tests; keep a smoke test for the
// argument surface.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from([
            "arbor", "parse", "x + 1", "--vars", "x", "--precision", "2",
        ])
        .unwrap();
        match args.command {
            Commands::Parse { precision, vars, .. } => {
                assert_eq!(precision, 2);
                assert_eq!(vars, vec!["x"]);
            }
            Commands::Info { .. } | Commands::Eval { .. } => panic!("wrong subcommand"),
        }
    }
}
