//! docseek CLI entry point

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    docseek_cli::run().await
}
