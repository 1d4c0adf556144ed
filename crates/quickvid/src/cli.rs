use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::download::quality::Quality;

#[derive(Parser, Debug)]
#[command(name = "quickvid")]
#[command(author, version, about = "Telegram bot that downloads a video link in the chosen quality", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (default)
    Run,

    /// Download one URL through the same pipeline, without Telegram
    Download {
        /// Video URL
        url: String,

        /// best, 1080p, 720p, 480p, 360p or audio
        #[arg(short, long, default_value = "best")]
        quality: Quality,

        /// Directory the finished file is copied to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_no_command() {
        let cli = Cli::try_parse_from(["quickvid"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_download_arguments() {
        let cli = Cli::try_parse_from(["quickvid", "download", "https://x.test/v", "-q", "720p", "-o", "/tmp/out"]).unwrap();
        match cli.command {
            Some(Commands::Download { url, quality, output }) => {
                assert_eq!(url, "https://x.test/v");
                assert_eq!(quality, Quality::P720);
                assert_eq!(output, PathBuf::from("/tmp/out"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_download_rejects_unknown_quality() {
        assert!(Cli::try_parse_from(["quickvid", "download", "https://x.test", "--quality", "4k"]).is_err());
    }
}
