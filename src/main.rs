mod config;
mod download;
mod error;
mod soundcloud;
mod transcode;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scdl", version, about = "Download a single SoundCloud track")]
struct Cli {
    /// Track page URL.
    #[arg(long)]
    from_url: String,

    /// API client id (defaults to the configured public id).
    #[arg(long)]
    client_id: Option<String>,

    /// Output file; defaults to the track title.
    #[arg(long)]
    out_file: Option<PathBuf>,

    /// How many times to poll the CDN before giving up.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_retries: Option<u32>,

    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    let client = soundcloud::SoundcloudClient::new(&cfg.http, &cfg.soundcloud.api_base)?;
    let transcoder = transcode::Ffmpeg::new(cfg.transcoder.program.clone());
    let client_id = cli.client_id.as_deref().unwrap_or(&cfg.soundcloud.client_id);
    let resolver = soundcloud::Resolver::new(
        cli.max_retries.unwrap_or(cfg.resolver.max_retries),
        cfg.resolver.interval(),
    );

    let req = download::Request {
        page_url: &cli.from_url,
        client_id,
        out_file: cli.out_file.as_deref(),
        resolver,
    };
    download::run(&client, &transcoder, &req)
        .await
        .with_context(|| format!("download {}", cli.from_url))?;

    Ok(())
}
