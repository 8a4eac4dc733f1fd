use anyhow::Result;

use clap::{Subcommand, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use fellowship_db::{schema, Connection};

#[derive(Parser, Debug)]
#[clap(name="fellowship-setup")]
struct Cli {
    #[clap(long, env = "FELLOWSHIP_DB", default_value="fellowship.sqlite3")]
    pub db: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command{
    /// Create the database and install the schema
    Init,
}

/// Initialize the database
async fn db_init(filename: &str) -> Result<()> {
    let conn = Connection::create(filename).await?;
    schema::install(&conn).await?;
    println!("Database {} is ready.", filename);

    Ok(())
}


#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init => db_init(&cli.db).await?,
    }
    Ok(())
}
