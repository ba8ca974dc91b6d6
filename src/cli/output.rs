//! Styled terminal output for detscale commands

use console::style;

use crate::scaling::ScalingResult;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a key-value pair with consistent styling
    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if !self.quiet {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {:<20} {}", style(key).dim(), styled_value);
        }
    }

    /// Print scaling results as an aligned table
    pub fn scaling_table(&self, results: &[ScalingResult]) {
        if self.quiet || results.is_empty() {
            return;
        }
        println!(
            "  {}",
            style(format!(
                "{:>5} {:>7} {:>12} {:>12} {:>9} {:>9}",
                "order", "workers", "serial ms", "parallel ms", "speedup", "bound"
            ))
            .dim()
        );
        for r in results {
            let speedup = format!("{:>9.3}", r.achieved_speedup);
            let speedup = if r.achieved_speedup > r.theoretical_max_speedup {
                style(speedup).yellow()
            } else {
                style(speedup).green()
            };
            println!(
                "  {:>5} {:>7} {:>12.3} {:>12.3} {} {:>9.3}",
                r.matrix_order,
                r.worker_count,
                r.serial_time_ms,
                r.parallel_time_ms,
                speedup,
                r.theoretical_max_speedup
            );
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
