//! CLI module for the JWKS server
//!
//! - `serve`: run the HTTP server (default)
//! - `rotate`: add one freshly generated signing key and exit

pub mod rotate;
pub mod serve;

use clap::{Parser, Subcommand};

/// JWKS server - RS256 token issuance with published verification keys
#[derive(Debug, Parser)]
#[command(name = "jwks-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Generate and store a new signing key
    Rotate(rotate::RotateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["jwks-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rotate_args() {
        let cli = Cli::try_parse_from(["jwks-server", "rotate", "--ttl-seconds", "120"]).unwrap();
        match cli.command {
            Some(Command::Rotate(args)) => assert_eq!(args.ttl_seconds, 120),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rotate_rejects_non_positive_ttl() {
        assert!(Cli::try_parse_from(["jwks-server", "rotate", "--ttl-seconds", "0"]).is_err());
    }
}
