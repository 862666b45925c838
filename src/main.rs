use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode, sync::Arc};
use tikgrab::{
    config::Config,
    media::{save_media, validate, HttpFetcher, ResolveError, Resolver, Session, Submission},
};
use tracing::{error, info};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TikTok link to resolve
    url: String,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Only check the link shape, without contacting the API
    #[arg(long)]
    check: bool,

    /// Download the resolved video
    #[arg(short, long)]
    save: bool,

    /// Directory to save into (implies --save)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also print the raw API response
    #[arg(long)]
    raw: bool,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/tikgrab/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/tikgrab/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = match get_config_path(&args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    init_logging(&config);

    if args.check {
        let verdict = validate(&args.url);
        return Ok(match verdict.reason() {
            None => {
                println!("valid");
                ExitCode::SUCCESS
            }
            Some(reason) => {
                println!("invalid: {}", reason);
                ExitCode::FAILURE
            }
        });
    }

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;
    let resolver = Resolver::with_fetcher(
        config.resolver_config()?,
        Arc::new(HttpFetcher::with_client(client.clone())),
    );
    let session = Session::new(resolver);

    let extraction = match session.submit(&args.url).await {
        Submission::Completed(Ok(extraction)) => extraction,
        Submission::Completed(Err(e)) => return Ok(report(&e)),
        Submission::Ignored => anyhow::bail!("Another request is already in flight"),
    };

    println!("{}", extraction.media_url);
    if args.raw {
        println!("{}", serde_json::to_string_pretty(&extraction.source)?);
    }

    if args.save || args.output_dir.is_some() {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.download_dir());
        match save_media(&client, &extraction.media_url, &dir).await {
            Ok(saved) => println!("{}", saved.path.display()),
            Err(e) => match e.downcast_ref::<ResolveError>() {
                Some(resolve_error) => return Ok(report(resolve_error)),
                None => return Err(e),
            },
        }
    }

    info!("Done");
    Ok(ExitCode::SUCCESS)
}

fn report(e: &ResolveError) -> ExitCode {
    error!(kind = ?e.kind(), "{}", e);
    eprintln!("{}", e.user_message());
    ExitCode::FAILURE
}
