mod cli;
mod runner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Paths may be provided through a .env file
    dotenvy::dotenv().ok();

    cli::run().await?;

    Ok(())
}
