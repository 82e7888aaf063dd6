//! Terminal rendering of problems, statistics and results.

use console::style;
use qfsm_core::{CircuitStats, Outcome, Problem, format_bits};
use qfsm_hal::ExecutionResult;

/// Outcomes shown before the list is cut short.
const MAX_ROWS: usize = 16;

/// Print the validated input.
pub fn print_problem(problem: &Problem) {
    println!("  x:    {}", style(format_bits(problem.x())).cyan());
    println!("  y:    {}", style(format_bits(problem.y())).cyan());
    if problem.is_padded() {
        println!(
            "  Padded from length {} to {}",
            problem.original_len(),
            problem.n()
        );
    }
    print!("  d:    {}   mode: {}", problem.d(), style(problem.mode()).yellow());
    if let Some(start) = problem.starting_position() {
        print!("   start: {start}");
    }
    println!();
}

/// Print circuit statistics.
pub fn print_stats(stats: &CircuitStats) {
    println!("\n{} Circuit statistics:", style("✓").green().bold());
    for line in stats.to_string().lines() {
        println!("  {line}");
    }
}

/// Print the distribution as a bar table.
pub fn print_results(result: &ExecutionResult) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        result.shots
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
        let prob = **count as f64 / total * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("\n  Execution time: {} ms", style(time_ms).yellow());
    }
}

/// Human-readable summary of a decoded outcome.
pub fn describe_outcome(outcome: &Outcome, d: usize) -> String {
    if !outcome.found {
        return format!("no common substring of length {d}");
    }
    let positions: Vec<String> = outcome.positions.iter().map(ToString::to_string).collect();
    format!(
        "common substring of length {d} at position{} {}",
        if positions.len() == 1 { "" } else { "s" },
        positions.join(", ")
    )
}

/// Print a decoded outcome.
pub fn print_outcome(outcome: &Outcome, d: usize) {
    let marker = if outcome.found {
        style("●").green()
    } else {
        style("○").red()
    };
    println!("\n{} {}", marker, describe_outcome(outcome, d));
}
