#[tokio::main]
async fn main() -> anyhow::Result<()> {
    caresense::start_server().await
}
