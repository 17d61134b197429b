#[tokio::main]
async fn main() -> eyre::Result<()> {
    notifications_api::run().await
}
