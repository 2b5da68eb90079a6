//! Utilities shared by the examples.

#![allow(dead_code)]

pub mod timeit;

use std::{fmt, time::Duration};

use console::style;

/// Wrapper displaying a duration with an adapted unit.
pub struct DisplayDuration(pub Duration);

impl fmt::Display for DisplayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let micros = self.0.as_micros();
        if micros < 1_000 {
            write!(f, "{micros} μs")
        } else if micros < 1_000_000 {
            write!(f, "{:.2} ms", micros as f64 / 1_000.0)
        } else {
            write!(f, "{:.2} s", self.0.as_secs_f64())
        }
    }
}

/// Parse an argument of the form `--name=value`.
pub fn parse_flag<T: std::str::FromStr>(arg: &str, name: &str) -> Option<Result<T, String>> {
    let value = arg.strip_prefix(name)?.strip_prefix('=')?;
    Some(
        value
            .parse::<T>()
            .map_err(|_| format!("Invalid `{name}` argument")),
    )
}

/// Print a line of results.
pub fn print_result<T: fmt::Display>(label: &str, value: T) {
    println!("{} {}", style(format!("{label:>12}:")).cyan(), value);
}
