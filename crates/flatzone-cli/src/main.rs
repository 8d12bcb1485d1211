//! flatzone - authoritative DNS server with ANAME flattening.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    flatzone_cli::run().await
}
