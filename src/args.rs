use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Demo GraphQL server
#[derive(Debug, Parser)]
#[command(name = "gql-server", about = "Test GraphQL Server")]
pub struct Args {
    /// Env file to load configuration from (default is ./.env when present)
    #[arg(long, global = true, env = "GQL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Development logging
    #[arg(long, global = true)]
    pub dev_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the GraphQL server
    Gql,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gql_command() {
        let args = Args::parse_from(["gql-server", "--dev-log", "gql", "--config", "dev.env"]);
        assert!(args.dev_log);
        assert_eq!(args.config, Some(PathBuf::from("dev.env")));
        assert!(matches!(args.command, Command::Gql));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["gql-server"]).is_err());
    }
}
