pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "golf-classic-api")]
#[command(about = "Golf Classic API - back office for the charity golf tournament")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Mint an admin bearer token signed with JWT_SECRET")]
    Token {
        #[arg(long, help = "Principal id (random when omitted)")]
        sub: Option<String>,
        #[arg(long, help = "Email recorded in the token")]
        email: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Migrate => commands::migrate::handle().await,
        Commands::Token { sub, email } => commands::token::handle(sub, email, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["golf-classic-api"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn token_flags_parse() {
        let cli = Cli::parse_from(["golf-classic-api", "--json", "token", "--sub", "admin-1"]);
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Some(Commands::Token { sub, email }) => {
                assert_eq!(sub.as_deref(), Some("admin-1"));
                assert!(email.is_none());
            }
            _ => panic!("expected token command"),
        }
    }
}
