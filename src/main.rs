use clap::Parser;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use drip::prelude::*;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    CliApp::new("drip").run(|writer| run(cli, writer)).await
}

/// Run the selected command and write its rendered output
async fn run<W>(cli: Cli, mut writer: W) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let output = execute(&cli.settings, cli.command).await?;

    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
