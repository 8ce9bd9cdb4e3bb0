use clap::Parser;
use hotelctl::{Application, Config, console::Console, telemetry};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args; clap exits with usage on missing or extra arguments
    let args = hotelctl::config::Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    telemetry::init_telemetry()?;

    tracing::debug!("{:?}", args);

    let mut console = Console::stdio();
    Application::connect(config, &mut console).await?.run(&mut console).await
}
