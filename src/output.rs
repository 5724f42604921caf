//! Coloured status lines for the operator.
//!
//! Progress goes to stdout, warnings and errors to stderr. `colored` drops the
//! escape codes on its own when the stream is not a terminal or `NO_COLOR` is
//! set.

use colored::Colorize;

pub fn step(msg: &str) {
    println!("{} {}", "==>".blue().bold(), msg.bold());
}

pub fn info(msg: &str) {
    println!("  {}", msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Prints an error together with its cause chain.
pub fn error(err: &anyhow::Error) {
    eprintln!("{} {}", "error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".red(), cause);
    }
}
