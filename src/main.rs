//! solar-quote entry point: CLI wiring around a calculator session.

use std::path::Path;
use std::process;

use solar_quote::CalcError;
use solar_quote::config::CalculatorConfig;
use solar_quote::io::export::export_csv;
use solar_quote::session::{CalculatorSession, SessionError, SessionEvent, SessionFile};
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION: &str = "sessions/demo.toml";

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    session_path: String,
    cashflow_out: Option<String>,
    snapshot_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("solar-quote - rooftop solar potential and amortization calculator");
    eprintln!();
    eprintln!("Usage: solar-quote [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load calculator config from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, sunbelt)");
    eprintln!("  --session <path>         Roof outline and inputs (default: {DEFAULT_SESSION})");
    eprintln!("  --cashflow-out <path>    Export the yearly cash flow to CSV");
    eprintln!("  --snapshot-out <path>    Write the session snapshot as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after calculating");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        session_path: DEFAULT_SESSION.to_string(),
        cashflow_out: None,
        snapshot_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                cli.config_path = Some(required_value(&args, i, "--config", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(required_value(&args, i, "--preset", "name"));
            }
            "--session" => {
                i += 1;
                cli.session_path = required_value(&args, i, "--session", "path");
            }
            "--cashflow-out" => {
                i += 1;
                cli.cashflow_out = Some(required_value(&args, i, "--cashflow-out", "path"));
            }
            "--snapshot-out" => {
                i += 1;
                cli.snapshot_out = Some(required_value(&args, i, "--snapshot-out", "path"));
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = required_value(&args, i, "--port", "u16");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn load_config(cli: &CliArgs) -> CalculatorConfig {
    let loaded = if let Some(ref path) = cli.config_path {
        CalculatorConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        CalculatorConfig::from_preset(name)
    } else {
        Ok(CalculatorConfig::baseline())
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

/// Applies one event, retrying a failed calculation once with the fallback
/// irradiance class when the location is outside every configured region.
fn apply_with_fallback(session: &mut CalculatorSession, event: SessionEvent) -> Result<(), SessionError> {
    match session.apply(event) {
        Err(SessionError::Calc(CalcError::UnknownIrradianceRegion { key })) => {
            let Some(site) = session.fallback_site() else {
                return Err(CalcError::UnknownIrradianceRegion { key }.into());
            };
            tracing::warn!(
                %key,
                fallback = %session.config().irradiance.default_class,
                "location outside configured regions, using fallback irradiance class"
            );
            session.apply(SessionEvent::SetSite { site: Some(site) })?;
            session.apply(SessionEvent::Calculate)?;
            Ok(())
        }
        other => other.map(|_| ()),
    }
}

fn main() {
    let cli = parse_args();
    init_logging();

    let config = load_config(&cli);

    let file = SessionFile::from_toml_file(Path::new(&cli.session_path)).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let mut session = CalculatorSession::new(config.clone());
    for event in file.into_events() {
        let name = event.name();
        if let Err(e) = apply_with_fallback(&mut session, event) {
            eprintln!("error: {name} failed: {e}");
            process::exit(1);
        }
    }

    let Some(quote) = session.results().cloned() else {
        eprintln!("error: session ended in {} without a quote", session.phase());
        process::exit(1);
    };

    for year in &quote.projection.years {
        println!("{year}");
    }
    println!("\n{quote}");

    if let Some(ref path) = cli.cashflow_out {
        if let Err(e) = export_csv(&quote.projection, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Cash flow written to {path}");
    }

    if let Some(ref path) = cli.snapshot_out {
        let written = session
            .snapshot()
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("error: failed to write snapshot: {e}");
            process::exit(1);
        }
        eprintln!("Snapshot written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_quote::api::AppState {
            config,
            quote: Some(quote),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(solar_quote::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
