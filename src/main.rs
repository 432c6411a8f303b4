#[tokio::main]
async fn main() -> anyhow::Result<()> {
    digital_profile::app::run().await
}
