//! site-signals entry point: CLI wiring, portfolio loading and reporting.

use std::process;

use chrono::Utc;
use tracing::{info, warn};

use site_signals::cli::{self, CliOptions, Command};
use site_signals::config::PortfolioConfig;
use site_signals::io::export::export_csv;
use site_signals::signal::window::truncate_to_hour;
use site_signals::signal::{SeriesSummary, SignalGenerator, SignalSeries};
use site_signals::site::SiteDescriptor;
use site_signals::telemetry::init_tracing;

fn load_portfolio(opts: &CliOptions) -> Result<PortfolioConfig, String> {
    let mut portfolio = match (&opts.config, &opts.preset) {
        (Some(path), _) => PortfolioConfig::from_toml_file(path),
        (None, Some(name)) => PortfolioConfig::from_preset(name),
        (None, None) => Ok(PortfolioConfig::demo()),
    }
    .map_err(|e| e.to_string())?;

    let window = &mut portfolio.generator.window;
    if let Some(h) = opts.past_hours {
        window.past_hours = h;
    }
    if let Some(h) = opts.future_hours {
        window.future_hours = h;
    }
    if let Some(h) = opts.step_hours {
        window.step_hours = h;
    }

    let errors = portfolio.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }
    Ok(portfolio)
}

fn select_sites(sites: Vec<SiteDescriptor>, opts: &CliOptions) -> Vec<SiteDescriptor> {
    let needle = opts.search.as_deref().map(str::to_lowercase);
    sites
        .into_iter()
        .filter(|s| opts.site.as_deref().is_none_or(|id| s.id == id))
        .filter(|s| {
            needle.as_deref().is_none_or(|n| {
                s.id.to_lowercase().contains(n) || s.name.to_lowercase().contains(n)
            })
        })
        .collect()
}

fn run(opts: &CliOptions) -> Result<(), String> {
    let portfolio = load_portfolio(opts)?;
    let sites = portfolio.descriptors().map_err(|e| e.to_string())?;
    let sites = select_sites(sites, opts);
    if sites.is_empty() {
        warn!("no site matches the given filters");
    }

    let now = opts
        .now
        .unwrap_or_else(|| truncate_to_hour(Utc::now().fixed_offset()));
    let generator = SignalGenerator::new(portfolio.generator).map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        lines.join("\n")
    })?;

    let series = sites
        .iter()
        .map(|site| generator.generate(site, now))
        .collect::<Result<Vec<SignalSeries>, _>>()
        .map_err(|e| e.to_string())?;
    info!(sites = series.len(), %now, "generated series");

    for s in &series {
        if opts.verbose {
            for sample in s.samples() {
                println!("{sample}");
            }
        }
        println!("{}\n", SeriesSummary::from_series(s));
    }

    if let Some(path) = &opts.out {
        export_csv(&series, path).map_err(|e| format!("failed to write CSV: {e}"))?;
        info!(path = %path.display(), "series written");
    }

    if opts.serve {
        serve(generator, sites, opts.port)?;
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(generator: SignalGenerator, sites: Vec<SiteDescriptor>, port: u16) -> Result<(), String> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use site_signals::api::{self, AppState};

    let state = Arc::new(AppState { generator, sites });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
    rt.block_on(api::serve(state, addr))
        .map_err(|e| format!("API server failed: {e}"))
}

#[cfg(not(feature = "api"))]
fn serve(_generator: SignalGenerator, _sites: Vec<SiteDescriptor>, _port: u16) -> Result<(), String> {
    Err("--serve requires the `api` feature".to_string())
}

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
