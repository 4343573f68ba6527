//! Command-line argument parsing for the `site-signals` binary.

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};

/// Default port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    /// TOML portfolio file; mutually exclusive with `preset`.
    pub config: Option<PathBuf>,
    /// Built-in preset name; `demo` when neither source is given.
    pub preset: Option<String>,
    /// Fixed reference instant; current hour when absent.
    pub now: Option<DateTime<FixedOffset>>,
    /// Exact site id filter.
    pub site: Option<String>,
    /// Case-insensitive substring filter on id and name.
    pub search: Option<String>,
    pub past_hours: Option<i64>,
    pub future_hours: Option<i64>,
    pub step_hours: Option<i64>,
    /// CSV export path.
    pub out: Option<PathBuf>,
    /// Print every sample, not just the summary.
    pub verbose: bool,
    pub serve: bool,
    pub port: u16,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config: None,
            preset: None,
            now: None,
            site: None,
            search: None,
            past_hours: None,
            future_hours: None,
            step_hours: None,
            out: None,
            verbose: false,
            serve: false,
            port: DEFAULT_PORT,
        }
    }
}

/// Outcome of parsing: run with options, or show help.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(CliOptions),
    Help,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a message describing the first bad argument.
pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

/// Parses an argument list (without the program name).
///
/// # Errors
///
/// Returns a message describing the first bad argument.
pub fn parse_options(args: &[String]) -> Result<Command, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--config" => {
                let path = args.next_or_err(&mut i, "--config", "a TOML file path")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                let name = args.next_or_err(&mut i, "--preset", "a preset name")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--now" => {
                let raw = args.next_or_err(&mut i, "--now", "an RFC 3339 timestamp")?;
                let now = DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| format!("--now value \"{raw}\" is not RFC 3339: {e}"))?;
                opts.now = Some(now);
            }
            "--site" => {
                opts.site = Some(args.next_or_err(&mut i, "--site", "a site id")?.to_string());
            }
            "--search" => {
                opts.search = Some(args.next_or_err(&mut i, "--search", "a search term")?.to_string());
            }
            "--past" => opts.past_hours = Some(parse_hours(args, &mut i, "--past")?),
            "--future" => opts.future_hours = Some(parse_hours(args, &mut i, "--future")?),
            "--step" => opts.step_hours = Some(parse_hours(args, &mut i, "--step")?),
            "--out" => {
                let path = args.next_or_err(&mut i, "--out", "a CSV file path")?;
                opts.out = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => opts.verbose = true,
            "--serve" => opts.serve = true,
            "--port" => {
                let raw = args.next_or_err(&mut i, "--port", "a u16")?;
                opts.port = raw
                    .parse()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.serve && !cfg!(feature = "api") {
        return Err("--serve requires the `api` feature".to_string());
    }
    if opts.config.is_none() && opts.preset.is_none() {
        opts.preset = Some("demo".to_string());
    }

    Ok(Command::Run(opts))
}

fn parse_hours(args: &[String], i: &mut usize, flag: &str) -> Result<i64, String> {
    let raw = args.next_or_err(i, flag, "a whole number of hours")?;
    raw.parse()
        .map_err(|_| format!("{flag} value \"{raw}\" is not a whole number of hours"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: &mut usize, flag: &str, expected: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: &mut usize, flag: &str, expected: &str) -> Result<&str, String> {
        *index += 1;
        self.get(*index)
            .map(String::as_str)
            .ok_or_else(|| format!("missing value for {flag} (expected {expected})"))
    }
}

pub fn print_usage() {
    eprintln!("site-signals: synthetic actual and forecast series for energy sites");
    eprintln!();
    eprintln!("Usage: site-signals [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>     Load the portfolio from a TOML file");
    eprintln!("  --preset <name>     Use a built-in portfolio (demo, solar_noon)");
    eprintln!("  --now <rfc3339>     Reference instant (default: current hour, UTC)");
    eprintln!("  --site <id>         Only generate the site with this id");
    eprintln!("  --search <text>     Only sites whose id or name contains the text");
    eprintln!("  --past <hours>      Hours of history (default from config: 24)");
    eprintln!("  --future <hours>    Hours of forecast (default from config: 96)");
    eprintln!("  --step <hours>      Hours between samples (default from config: 1)");
    eprintln!("  --out <path>        Export every series to CSV");
    eprintln!("  --verbose, -v       Print every sample");
    if cfg!(feature = "api") {
        eprintln!("  --serve             Serve the REST API after generating");
        eprintln!("  --port <u16>        API port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help, -h          Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_options(&args)
    }

    fn run(args: &[&str]) -> CliOptions {
        match parse(args).expect("parse should succeed") {
            Command::Run(opts) => opts,
            Command::Help => panic!("expected run options"),
        }
    }

    #[test]
    fn defaults_to_demo_preset() {
        let opts = run(&[]);
        assert_eq!(opts.preset.as_deref(), Some("demo"));
        assert!(opts.config.is_none());
        assert_eq!(opts.port, DEFAULT_PORT);
    }

    #[test]
    fn supports_config_file() {
        let opts = run(&["--config", "portfolio.toml"]);
        assert_eq!(
            opts.config.as_deref().and_then(|p| p.to_str()),
            Some("portfolio.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn config_and_preset_conflict() {
        let err = parse(&["--config", "a.toml", "--preset", "demo"]).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn window_overrides_and_filters() {
        let opts = run(&[
            "--now",
            "2024-06-15T12:00:00+02:00",
            "--past",
            "0",
            "--future",
            "48",
            "--step",
            "3",
            "--search",
            "wind",
        ]);
        assert_eq!(opts.past_hours, Some(0));
        assert_eq!(opts.future_hours, Some(48));
        assert_eq!(opts.step_hours, Some(3));
        assert_eq!(opts.search.as_deref(), Some("wind"));
        assert_eq!(
            opts.now.map(|n| n.to_rfc3339()).as_deref(),
            Some("2024-06-15T12:00:00+02:00")
        );
    }

    #[test]
    fn negative_hours_parse_and_are_left_to_validation() {
        let opts = run(&["--past", "-4"]);
        assert_eq!(opts.past_hours, Some(-4));
    }

    #[test]
    fn bad_now_is_rejected() {
        let err = parse(&["--now", "noon"]).unwrap_err();
        assert!(err.contains("--now"));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse(&["--site"]).unwrap_err();
        assert!(err.contains("missing value for --site"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse(&["--frobnicate"]).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(&["--past", "1", "-h"]), Ok(Command::Help));
    }
}
