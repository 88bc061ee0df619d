use anyhow::Result;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    mitmachen::cli::run().await
}
