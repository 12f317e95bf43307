use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_kernel::settings::Settings;

/// Folio book catalogue service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Apply module schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => folio_app::bootstrap::serve(settings).await,
        Command::Migrate => {
            let applied = folio_app::bootstrap::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
    }
}
