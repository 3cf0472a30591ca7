mod output;
mod parser;
mod settings;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use parser::record::FlagUrlTemplate;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "gen_flag_list",
    version,
    about = "Generate a JSON list of ISO 3166-1 alpha-2 countries from Wikipedia",
    after_help = "Settings are read from FLAGS_* environment variables \
                  (FLAGS_SOURCE_URL, FLAGS_SOURCE_FILE, FLAGS_TABLE_SELECTOR, \
                  FLAGS_FLAG_EXTENSION, FLAGS_TIMEOUT_SECS, FLAGS_USER_AGENT)."
)]
struct Cli {
    /// JSON file to write
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    /// Base for flag URLs, e.g. https://example.com/flags/ (must end in a slash)
    #[arg(value_name = "FLAG_BASE_URL")]
    flag_base_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    run(&cli, &settings).await?;

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    eprintln!("Success");
    Ok(())
}

async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let html = source::load(settings).await?;

    let flags = cli
        .flag_base_url
        .as_deref()
        .filter(|base| !base.trim().is_empty())
        .map(|base| FlagUrlTemplate::new(base, &settings.flag_extension));

    let records = parser::extract_countries(&html, &settings.table_selector, flags.as_ref())
        .context("Failed to parse the ISO 3166 table")?;

    output::write_json(&cli.output, &records)
}
