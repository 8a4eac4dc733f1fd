
use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use fellowship_db::Connection;
use fellowship_cli::cli::{Command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::init();
    let settings = cli.settings();

    let conn = Connection::open(&cli.db).await?;
    match cli.command {
        Command::Members(cmd) => cmd.run(&conn).await,
        Command::Dues(cmd) => cmd.run(&conn, &settings).await,
        Command::Finance(cmd) => cmd.run(&conn).await,
        Command::Search(cmd) => cmd.run(&conn).await,
        Command::Announcements(cmd) => cmd.run(&conn).await,
        Command::Find(cmd) => cmd.run(conn, &settings).await,
    }?;

    Ok(())
}
