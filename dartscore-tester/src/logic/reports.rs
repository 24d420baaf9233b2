use anyhow::Result;
use colored::Colorize;
use dartscore_game::{CheckoutSuggestion, format_route};
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> (usize, usize, f64) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = if total == 0 {
        0.0
    } else {
        (passed as f64 / total as f64) * 100.0
    };
    (total, passed, rate)
}

fn result_label(result: &ScenarioResult) -> String {
    match result.seed {
        Some(seed) => format!("{} (seed {seed})", result.scenario_name),
        None => result.scenario_name.clone(),
    }
}

pub fn generate_console_report(
    out: &mut impl Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let (total, passed, rate) = success_rate(results);
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} {}", status, result_label(result).bold())?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            result_label(fastest).green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            result_label(slowest).yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Dartscore Logic Test Results\n")?;

    let (total, passed, rate) = success_rate(results);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {}\n", result_label(result))?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_checkout(
    out: &mut impl Write,
    remaining: i32,
    double_out: bool,
    suggestion: &CheckoutSuggestion,
) -> Result<()> {
    let rule = if double_out { "double-out" } else { "straight-out" };
    writeln!(out, "{}", format!("🎯 Checkout for {remaining} ({rule})").bright_cyan().bold())?;
    writeln!(out, "{}", suggestion.note)?;
    if suggestion.routes.is_empty() {
        let verdict = if suggestion.finishable {
            "nothing left to throw"
        } else {
            "no route this visit"
        };
        writeln!(out, "  ({verdict})")?;
    }
    for (rank, route) in suggestion.routes.iter().enumerate() {
        writeln!(out, "  {:>3}. {}", rank + 1, format_route(route))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartscore_game::checkout_suggestion;

    fn sample(passed: bool, seed: Option<u64>) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Random Cricket Legs".to_string(),
            seed,
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["Iteration 2 (seed 8): leg did not finish".to_string()]
            },
            average_duration: Duration::from_millis(3),
            performance_data: vec![Duration::from_millis(3)],
        }
    }

    #[test]
    fn console_report_lists_failures() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        generate_console_report(
            &mut buf,
            &[sample(true, None), sample(false, Some(7))],
            Duration::from_millis(9),
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Total scenarios: 2"));
        assert!(text.contains("Success rate: 50.0%"));
        assert!(text.contains("Random Cricket Legs (seed 7)"));
        assert!(text.contains("leg did not finish"));
    }

    #[test]
    fn markdown_report_has_summary() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[sample(true, Some(1))]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Dartscore Logic Test Results"));
        assert!(text.contains("- **Passed**: 1"));
    }

    #[test]
    fn json_report_is_an_array() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &[sample(true, None)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn checkout_output_numbers_routes() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        write_checkout(&mut buf, 170, true, &checkout_suggestion(170, true)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. T20 \u{2022} T20 \u{2022} Inner Bull"));

        let mut buf = Vec::new();
        write_checkout(&mut buf, 169, true, &checkout_suggestion(169, true)).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("no route this visit"));
    }
}
