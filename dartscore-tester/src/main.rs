mod logic;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use dartscore_game::checkout_suggestion;
use logic::catalog::catalog_scenarios;
use logic::{LogicTester, ScenarioResult, find_catalog_scenario, list_scenarios};
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "dartscore-tester", version = "0.1.0")]
#[command(about = "Scenario and simulation testing for dartscore X01 and Cricket scoring")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Print checkout routes for a remaining score and exit
    #[arg(long, allow_negative_numbers = true)]
    checkout: Option<i32>,

    /// Use straight-out rules for --checkout
    #[arg(long)]
    straight_out: bool,

    /// Seeds for simulated legs (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of simulated legs per seed
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? || maybe_print_checkout(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;
    let results = run_logic_scenarios(&args, &scenarios, &seeds);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:25} - {description}")?;
    }
    out.flush()?;
    Ok(true)
}

fn maybe_print_checkout(args: &Args) -> Result<bool> {
    let Some(remaining) = args.checkout else {
        return Ok(false);
    };
    let double_out = !args.straight_out;
    let suggestion = checkout_suggestion(remaining, double_out);
    let mut out = open_output(args.output.as_deref())?;
    logic::reports::write_checkout(&mut out, remaining, double_out, &suggestion)?;
    out.flush()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎯 Dartscore Automated Tester".bright_cyan().bold());
    println!("{}", "=================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for scenario in catalog_scenarios() {
            if !scenarios.iter().any(|s| s == scenario.key) {
                scenarios.push(scenario.key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(args: &Args, scenarios: &[String], seeds: &[u64]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = find_catalog_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut out, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut out, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut out,
                    "# Dartscore Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut out, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut out, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut out,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut out)?;
            writeln!(&mut out, "🏁 Total time: {duration:?}")?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Report sink: the `--output` file when given, otherwise stdout.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(stdout()))),
    }
}
