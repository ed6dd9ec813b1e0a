//! Morse CLI
//!
//! Encode and decode Morse code from the terminal, or run the Telegram bot.
//!
//! ## Usage
//!
//! ```bash
//! morse encode "Bora Tanrıkulu"      # -... --- .-. .- / - .- -. .-. .. -.- ..- .-.. ..-
//! morse decode "... --- ..."         # SOS
//! echo sos | morse encode            # reads stdin
//! morse decode --file message.txt
//! morse table
//! TELEGRAM_API_TOKEN=... morse bot
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use morse_config::BotConfig;
use morse_core::Transcript;
use morse_telegram::BotClient;

#[derive(Parser)]
#[command(name = "morse")]
#[command(about = "Morse code encoder/decoder and Telegram bot")]
#[command(version)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode plain text into Morse code
    Encode(TranscodeArgs),

    /// Decode Morse code into plain text
    Decode(TranscodeArgs),

    /// Print the code table
    Table,

    /// Run the Telegram bot
    Bot {
        /// Config file (default: $MORSE_CONFIG or <config dir>/morse/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TranscodeArgs {
    /// Input text; words are joined with spaces. Reads stdin when omitted.
    text: Vec<String>,

    /// Read input from a file instead
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Fail if any symbol or signal had to be dropped
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy)]
enum Direction {
    Encode,
    Decode,
}

impl Direction {
    fn transcode(self, input: &str) -> Transcript {
        match self {
            Direction::Encode => morse_core::encode_detailed(input),
            Direction::Decode => morse_core::decode_detailed(input),
        }
    }

    fn transcode_reader<R: Read>(self, reader: R) -> morse_core::Result<Transcript> {
        match self {
            Direction::Encode => morse_core::encode_reader_detailed(reader),
            Direction::Decode => morse_core::decode_reader_detailed(reader),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Encode(args) => cmd_transcode(Direction::Encode, args),
        Commands::Decode(args) => cmd_transcode(Direction::Decode, args),
        Commands::Table => cmd_table(),
        Commands::Bot { config } => cmd_bot(config),
    };

    exit_code(result)
}

fn exit_code(result: Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    let default = if verbose {
        "morse=debug,morse_core=debug,morse_config=debug,morse_telegram=debug"
    } else {
        "morse=info,morse_core=info,morse_config=info,morse_telegram=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    // Logs go to stderr so stdout carries only the transcoded text.
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

// ═══════════════════════════════════════════════════════════
// ENCODE / DECODE
// ═══════════════════════════════════════════════════════════

fn cmd_transcode(direction: Direction, args: TranscodeArgs) -> Result<ExitCode> {
    let transcript = transcode_input(direction, &args)?;

    println!("{}", transcript.output);

    if !transcript.is_lossless() {
        tracing::warn!(
            direction = direction.name(),
            dropped = ?transcript.dropped,
            "some input could not be transcoded"
        );
        if args.strict {
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn transcode_input(direction: Direction, args: &TranscodeArgs) -> Result<Transcript> {
    if let Some(path) = &args.file {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        return direction
            .transcode_reader(file)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    if !args.text.is_empty() {
        return Ok(direction.transcode(&args.text.join(" ")));
    }

    Ok(direction.transcode_reader(io::stdin().lock())?)
}

// ═══════════════════════════════════════════════════════════
// TABLE
// ═══════════════════════════════════════════════════════════

fn cmd_table() -> Result<ExitCode> {
    let table = morse_core::table();

    println!("\n  MORSE CODE TABLE ({} symbols)\n", table.len());
    for (symbol, signal) in table.entries() {
        println!("  {symbol}  {signal}");
    }
    println!();

    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════
// BOT
// ═══════════════════════════════════════════════════════════

fn cmd_bot(config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = BotConfig::load(config_path.as_deref()).context("Failed to load bot config")?;
    tracing::debug!(?config, "bot config");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let client = BotClient::new(config);
        morse_telegram::run(client, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Bot stopped")
    })?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_encode_words() {
        let cli = Cli::parse_from(["morse", "encode", "hello", "world", "--strict"]);
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.text, vec!["hello", "world"]);
                assert!(args.strict);
                let transcript = transcode_input(Direction::Encode, &args).unwrap();
                assert_eq!(transcript.output, ".... . .-.. .-.. --- / .-- --- .-. .-.. -..");
            }
            _ => panic!("expected encode"),
        }
    }

    #[test]
    fn test_file_conflicts_with_text() {
        let result = Cli::try_parse_from(["morse", "decode", "...", "--file", "x.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["morse", "table", "--verbose", "--json-logs"]);
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Table));
    }

    #[test]
    fn test_read_missing_file() {
        let args = TranscodeArgs {
            text: Vec::new(),
            file: Some(PathBuf::from("/nonexistent/morse/input.txt")),
            strict: false,
        };
        let err = transcode_input(Direction::Decode, &args).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_file_input_goes_through_reader() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"... --- ... / xx").unwrap();

        let args = TranscodeArgs {
            text: Vec::new(),
            file: Some(file.path().to_path_buf()),
            strict: true,
        };
        let transcript = transcode_input(Direction::Decode, &args).unwrap();
        assert_eq!(transcript.output, "SOS ");
        assert_eq!(transcript.dropped, vec!["xx".to_string()]);
    }

    #[test]
    fn test_unreadable_file_reports_input_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x2e, 0xff, 0xfe]).unwrap();

        let args = TranscodeArgs {
            text: Vec::new(),
            file: Some(file.path().to_path_buf()),
            strict: false,
        };
        let err = transcode_input(Direction::Decode, &args).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
        assert!(matches!(
            err.downcast_ref::<morse_core::Error>(),
            Some(morse_core::Error::Input(_))
        ));
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(ExitCode::SUCCESS)), ExitCode::SUCCESS);
        assert_eq!(exit_code(Err(anyhow::anyhow!("boom"))), ExitCode::FAILURE);
    }

    #[test]
    fn test_direction_transcode() {
        assert_eq!(Direction::Encode.transcode("sos").output, "... --- ...");
        assert_eq!(Direction::Decode.transcode("... --- ...").output, "SOS");
        assert!(!Direction::Decode.transcode("... xx").is_lossless());
    }
}
