#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blobgate::run().await
}
