// Rise Advisor headless entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rise_advisor_lib::run().await
}
