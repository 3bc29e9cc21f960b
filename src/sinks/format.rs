use std::fmt::Write as _;

use crate::error::SinkError;

use super::{DURATION_FIELD, MEASUREMENT};

fn write_line(output: &mut String, args: std::fmt::Arguments<'_>) -> Result<(), SinkError> {
    output
        .write_fmt(args)
        .and_then(|()| output.write_char('\n'))
        .map_err(|err| SinkError::WriteLine { source: err })
}

/// `request_times,duration=<secs, 6 decimals> <unix micros>`
///
/// # Errors
///
/// Returns an error if the line cannot be formatted.
pub fn format_line_protocol(duration_seconds: f64, unix_micros: i64) -> Result<String, SinkError> {
    let mut output = String::new();
    write_line(
        &mut output,
        format_args!(
            "{},{}={:.6} {}",
            MEASUREMENT, DURATION_FIELD, duration_seconds, unix_micros
        ),
    )?;
    Ok(output)
}

/// `request_times{label="duration"} <secs> <unix seconds>`
///
/// # Errors
///
/// Returns an error if the line cannot be formatted.
pub fn format_prometheus(duration_seconds: f64, unix_seconds: i64) -> Result<String, SinkError> {
    let mut output = String::new();
    write_line(
        &mut output,
        format_args!(
            "{}{{label=\"{}\"}} {} {}",
            MEASUREMENT, DURATION_FIELD, duration_seconds, unix_seconds
        ),
    )?;
    Ok(output)
}
