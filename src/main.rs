use anyhow::Context;
use clap::Parser;
use floodscope::storage::{object_key, ObjectStore, S3Store, UrlSigner};
use floodscope::vision::{ImageSource, OpenAiVision, Summarizer};
use floodscope::{run_automation, Config};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "floodscope",
    about = "Capture a flood-map screenshot for an address and turn it into a risk report"
)]
struct Cli {
    /// Property address to search on the flood map
    #[arg(default_value = "148-154 Jonson Street, Byron Bay NSW 2481")]
    address: String,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Where to write the captured map screenshot
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Stop after the upload step, skipping the signed URL and the report
    #[arg(long)]
    skip_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let mut config = Config::default();
    config.browser.headless = !cli.headed;
    if let Some(path) = cli.screenshot {
        config.map.screenshot_path = path;
    }
    config.storage.bucket = std::env::var("BUCKET_NAME").unwrap_or_default();
    if let Ok(region) = std::env::var("AWS_REGION") {
        config.storage.region = region;
    }

    let screenshot = run_automation(&config, &cli.address)
        .await
        .context("map automation failed")?;
    println!("Screenshot written to {}", screenshot.display());

    let store = S3Store::from_env(&config.storage).context("storage configuration")?;
    let key = object_key(&config.storage.key_prefix, &cli.address);
    let object = store
        .upload(&screenshot, &key)
        .await
        .context("screenshot upload failed")?;
    println!("Object URL: {}", object.url);

    if cli.skip_report {
        return Ok(());
    }

    let expiry = Duration::from_secs(config.storage.presign_expiry_secs);
    let signed = store
        .signed_url(&object, expiry)
        .context("presigning failed")?;
    println!("Signed URL ({}s expiry): {}", expiry.as_secs(), signed);

    let summarizer = OpenAiVision::from_env(&config.summarizer).context("summarizer configuration")?;
    info!("generating flood risk summary");
    let report = summarizer
        .summarize(ImageSource::Url(signed))
        .await
        .context("summary generation failed")?;

    println!("\nFlood risk summary:\n{report}");
    Ok(())
}
