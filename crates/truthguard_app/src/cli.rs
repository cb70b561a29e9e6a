use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use truthguard_core::Theme;

#[derive(Debug, Parser)]
#[command(name = "truthguard")]
#[command(about = "Check news text, articles and screenshots for misinformation")]
#[command(version)]
pub struct Cli {
    /// Base address of the detection server, e.g. http://localhost:8000
    #[arg(long, env = "TRUTHGUARD_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// Per-request timeout for the scrape and predict calls
    #[arg(long, env = "TRUTHGUARD_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// The tesseract executable used for OCR
    #[arg(long, env = "TRUTHGUARD_TESSERACT", default_value = "tesseract", global = true)]
    pub tesseract: PathBuf,

    /// Directory holding preferences.ron
    #[arg(long, env = "TRUTHGUARD_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Log file to write; defaults to truthguard.log in the working directory
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Also log to the terminal, at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one detection and print the result
    Detect(DetectArgs),
    /// Line-oriented session; type `help` for commands
    Interactive,
    /// Show the saved theme, or save a new one
    Theme {
        #[arg(value_parser = parse_theme)]
        theme: Option<Theme>,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct DetectArgs {
    /// Article or claim text
    #[arg(long)]
    pub text: Option<String>,
    /// Article URL, scraped by the server
    #[arg(long)]
    pub url: Option<String>,
    /// PNG or JPEG screenshot, read with OCR
    #[arg(long)]
    pub image: Option<PathBuf>,
}

pub fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::from_label(value).ok_or_else(|| format!("unknown theme `{value}` (light, dark, system)"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};
    use truthguard_core::Theme;

    #[test]
    fn detect_accepts_exactly_one_input() {
        let cli = Cli::try_parse_from([
            "truthguard",
            "--server-url",
            "http://localhost:8000",
            "detect",
            "--text",
            "Aliens landed",
        ])
        .unwrap();
        match cli.command {
            Command::Detect(args) => {
                assert_eq!(args.text.as_deref(), Some("Aliens landed"));
                assert!(args.url.is_none());
                assert!(args.image.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["truthguard", "detect"]).is_err());
        assert!(Cli::try_parse_from([
            "truthguard",
            "detect",
            "--text",
            "a",
            "--url",
            "https://b.example",
        ])
        .is_err());
    }

    #[test]
    fn theme_argument_is_case_insensitive() {
        let cli = Cli::try_parse_from(["truthguard", "theme", "DARK"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme {
                theme: Some(Theme::Dark)
            }
        ));
        assert!(Cli::try_parse_from(["truthguard", "theme", "purple"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "truthguard",
            "interactive",
            "--timeout-secs",
            "5",
            "--log-file",
            "/tmp/tg.log",
        ])
        .unwrap();
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(
            cli.log_file.as_deref(),
            Some(std::path::Path::new("/tmp/tg.log"))
        );
    }
}
