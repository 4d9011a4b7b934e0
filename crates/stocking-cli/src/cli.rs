use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stocking",
    about = "Stocking: custom artwork and sounds for the sock advent calendar",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `data_dir` from the config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store one asset (bg, sock, gift_<N>, audio_bgm, audio_drum, audio_tada)
    Put(PutArgs),
    /// Store prize images, matched to slots by the number in each filename
    Prizes(PrizesArgs),
    /// List stored assets
    List(ListArgs),
    /// Show the resolved asset configuration
    Show(ShowArgs),
    /// Write every stored asset to a backup file
    Export(ExportArgs),
    /// Restore assets from a backup file
    Import(ImportArgs),
    /// Delete every stored asset
    Reset(ResetArgs),
    /// Deal a prize board and open socks
    Board(BoardArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct PutArgs {
    pub key: String,
    pub file: PathBuf,
    /// Content type; guessed from the file extension when omitted
    #[arg(long)]
    pub media_type: Option<String>,
}

#[derive(Args)]
pub struct PrizesArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct ShowArgs {}

#[derive(Args)]
pub struct ExportArgs {
    /// Defaults to santa-gift-assets-<date>.json
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation check
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Seed for a reproducible deal
    #[arg(long)]
    pub seed: Option<u64>,
    /// Slots to open, in order (0-based)
    #[arg(short, long)]
    pub open: Vec<usize>,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_put() {
        let cli = Cli::try_parse_from(["stocking", "put", "gift_7", "seven.png"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.key, "gift_7");
            assert_eq!(args.file, PathBuf::from("seven.png"));
            assert!(args.media_type.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_put_media_type() {
        let cli = Cli::try_parse_from([
            "stocking",
            "put",
            "audio_bgm",
            "track",
            "--media-type",
            "audio/ogg",
        ])
        .unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.media_type, Some("audio/ogg".into()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_prizes() {
        let cli = Cli::try_parse_from(["stocking", "prizes", "1.png", "2.png"]).unwrap();
        if let Command::Prizes(args) = cli.command {
            assert_eq!(args.files.len(), 2);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn prizes_requires_files() {
        assert!(Cli::try_parse_from(["stocking", "prizes"]).is_err());
    }

    #[test]
    fn parse_export_stdout() {
        let cli = Cli::try_parse_from(["stocking", "export", "--stdout"]).unwrap();
        if let Command::Export(args) = cli.command {
            assert!(args.stdout);
            assert!(args.output.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn export_output_conflicts_with_stdout() {
        assert!(Cli::try_parse_from(["stocking", "export", "--stdout", "-o", "x.json"]).is_err());
    }

    #[test]
    fn parse_import() {
        let cli = Cli::try_parse_from(["stocking", "import", "backup.json"]).unwrap();
        assert!(matches!(cli.command, Command::Import(_)));
    }

    #[test]
    fn parse_reset_yes() {
        let cli = Cli::try_parse_from(["stocking", "reset", "-y"]).unwrap();
        if let Command::Reset(args) = cli.command {
            assert!(args.yes);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_board() {
        let cli =
            Cli::try_parse_from(["stocking", "board", "--seed", "42", "-o", "3", "-o", "10"]).unwrap();
        if let Command::Board(args) = cli.command {
            assert_eq!(args.seed, Some(42));
            assert_eq!(args.open, vec![3, 10]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_globals() {
        let cli = Cli::try_parse_from([
            "stocking",
            "list",
            "--verbose",
            "--data-dir",
            "/tmp/advent",
            "--config",
            "stocking.toml",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/advent")));
        assert_eq!(cli.config, Some(PathBuf::from("stocking.toml")));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["stocking", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config(_)));
    }
}
