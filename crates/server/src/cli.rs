//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "scholar-server", version, about = "Summarize academic PDFs with retrieval-augmented generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve {
        /// Bind address (overrides HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Summarize one PDF and print the result
    Summarize {
        /// Path to the PDF
        pdf: PathBuf,
        /// What to focus the summary on
        #[arg(long, short)]
        query: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["scholar-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from(["scholar-server", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Some(Command::Serve { host, port }) => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn summarize_takes_path_and_query() {
        let cli = Cli::try_parse_from(["scholar-server", "summarize", "paper.pdf", "-q", "methods"])
            .unwrap();
        match cli.command {
            Some(Command::Summarize { pdf, query }) => {
                assert_eq!(pdf, PathBuf::from("paper.pdf"));
                assert_eq!(query.as_deref(), Some("methods"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
