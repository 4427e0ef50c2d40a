mod cli;
mod commands;

use pdfpal_config::{Settings, SettingsStore};
use tracing_subscriber::EnvFilter;
use tracing::warn;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let candidates = [
        std::path::PathBuf::from(".env"),
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();

    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("pdfpal=warn");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "pdfpal=warn".parse().unwrap()),
            ),
        )
        .init();

    let settings = match &args.config {
        Some(path) => pdfpal_config::load_from_path(std::path::Path::new(path)),
        None => pdfpal_config::load_default(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            warn!("failed to load settings: {e}, using defaults");
            Settings::default()
        }
    };
    let store = SettingsStore::new(settings);

    if let Err(e) = commands::run(&args.command, &store).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
