use sgit::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    CliApp::new().run().await
}
