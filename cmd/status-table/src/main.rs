//! Status table tool
//!
//! With no arguments, prints every status code. Otherwise resolves each
//! argument as a status name, a status value, or a raw status word.
//!
//! # Environment Variables
//!
//! - `MPR_STATUS_TABLE_FORMAT=plain|csv` - Output format (default plain)
//! - `MPR_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `MPR_FLUSH_LOG=1` - Flush log output immediately

use std::io::{self, Write};
use std::process::ExitCode;
use std::str::FromStr;

use mpr_status::config::env_get;
use mpr_status::{mpr_debug, mpr_error};
use mpr_status::{Status, StatusBits, StatusConfig};

// MPR_STATUS_TABLE_FORMAT=csv cargo run -p mpr-status-table -- ready 0x3e

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Plain,
    Csv,
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Format::Plain),
            "csv" => Ok(Format::Csv),
            _ => Err(()),
        }
    }
}

/// One resolved argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Code(Status),
    Word(StatusBits),
}

// A byte that is not one of the codes is shown as a raw word.
fn resolve(arg: &str) -> Option<Resolved> {
    match arg.parse::<Status>() {
        Ok(status) => Some(Resolved::Code(status)),
        Err(_) => arg.parse::<StatusBits>().ok().map(Resolved::Word),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

fn header(format: Format) -> String {
    match format {
        Format::Plain => format!("{:<10} {:>5}  {:<4}  {:<10}", "NAME", "VALUE", "HEX", "BITS"),
        Format::Csv => "name,value,hex,bits".to_string(),
    }
}

fn code_row(status: Status, format: Format) -> String {
    let v = status.value();
    match format {
        Format::Plain => format!("{:<10} {:>5}  {:#04x}  {:#010b}", status, v, v, v),
        Format::Csv => format!("{},{},{:#04x},{:#010b}", status, v, v, v),
    }
}

fn word_row(bits: StatusBits, format: Format) -> String {
    let raw = bits.raw();
    match format {
        Format::Plain => format!(
            "{:#04x}  stage={} ready={} active={} expired={}",
            raw,
            bits.stage(),
            yes_no(bits.is_ready()),
            yes_no(bits.is_active()),
            yes_no(bits.is_expired()),
        ),
        Format::Csv => format!(
            "{:#04x},{},{},{},{}",
            raw,
            bits.stage(),
            bits.is_ready(),
            bits.is_active(),
            bits.is_expired(),
        ),
    }
}

/// Print the table, or one row per argument; returns how many arguments
/// could not be resolved
fn run<W: Write>(args: &[String], format: Format, out: &mut W) -> io::Result<usize> {
    if args.is_empty() {
        writeln!(out, "{}", header(format))?;
        for status in Status::iter() {
            writeln!(out, "{}", code_row(status, format))?;
        }
        return Ok(0);
    }

    let mut failed = 0usize;
    for arg in args {
        match resolve(arg) {
            Some(Resolved::Code(status)) => writeln!(out, "{}", code_row(status, format))?,
            Some(Resolved::Word(bits)) => writeln!(out, "{}", word_row(bits, format))?,
            None => {
                mpr_error!("'{}' is not a status name, value or byte", arg);
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn main() -> ExitCode {
    let config = StatusConfig::from_env();
    config.apply();

    let format: Format = env_get("MPR_STATUS_TABLE_FORMAT", Format::Plain);
    mpr_debug!("format={:?} config={:?}", format, config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    match run(&args, format, &mut stdout.lock()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            mpr_error!("write failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
