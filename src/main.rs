#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = kidzibooks_rust::run().await {
        eprintln!("kidzibooks-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
