use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use api::BackendConfig;
use services::{AppServices, Clock};
use ui::{App, UiApp, build_app_context};

const APP_NAME: &str = "Sightread";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUrl { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUrl { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn app_name(&self) -> &str {
        APP_NAME
    }

    fn services(&self) -> AppServices {
        self.services.clone()
    }
}

struct Args {
    backend_main: Option<String>,
    backend_music: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--backend-main <url>] [--backend-music <url>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SIGHTREAD_BACKEND_MAIN   main backend (auth, saved sessions)");
    eprintln!("  SIGHTREAD_BACKEND_MUSIC  music-generation backend");
    eprintln!("  RUST_LOG                 log filter (default: info)");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend_main = None;
        let mut backend_music = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend-main" => {
                    let value = require_value(args, "--backend-main")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidUrl {
                            flag: "--backend-main",
                            raw: value,
                        });
                    }
                    backend_main = Some(value);
                }
                "--backend-music" => {
                    let value = require_value(args, "--backend-music")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidUrl {
                            flag: "--backend-music",
                            raw: value,
                        });
                    }
                    backend_music = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            backend_main,
            backend_music,
        })
    }
}

fn backend_config(args: &Args) -> Result<BackendConfig, Box<dyn std::error::Error>> {
    // Flags win over environment; both fall back to SIGHTREAD_BACKEND_*.
    let main = match &args.backend_main {
        Some(url) => url.clone(),
        None => std::env::var(api::config::BACKEND_MAIN_VAR)?,
    };
    let music = match &args.backend_music {
        Some(url) => url.clone(),
        None => std::env::var(api::config::BACKEND_MUSIC_VAR)?,
    };
    Ok(BackendConfig::from_parts(&main, &music)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = backend_config(&args).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::info!(
        main = %config.main_url(),
        music = %config.music_url(),
        "starting {APP_NAME}"
    );

    let services = AppServices::new_remote(config, Clock::default_clock());
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(APP_NAME)
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
