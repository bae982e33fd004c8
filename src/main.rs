// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use subconv::app_config::{Config, LogLevel};
use subconv::registry::{FormatKind, detect_provider_for_file, implementations};
use subconv::{Controller, DocumentOverrides};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file, or every subtitle file in a directory
    Convert(ConvertArgs),

    /// Print the detected format of a subtitle file
    Detect {
        /// File to inspect
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// List the supported formats in detection order
    Formats,

    /// Generate shell completions for subconv
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input subtitle file or directory
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file, or output directory when INPUT is a directory
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output format id (srt, webvtt, ttaf1, txt); defaults to the configured one
    #[arg(short = 't', long = "to", value_name = "FORMAT")]
    format: Option<String>,

    /// Prepend a UTF-8 byte-order mark
    #[arg(long)]
    bom: bool,

    /// Source framerate for frame-based input, forced on frame-based output
    #[arg(long)]
    framerate: Option<f64>,

    /// Language written to the output
    #[arg(long)]
    language: Option<String>,

    /// TTAF1 template name or file
    #[arg(long)]
    template: Option<String>,

    /// TTAF1 title
    #[arg(long)]
    title: Option<String>,

    /// TTAF1 copyright
    #[arg(long)]
    copyright: Option<String>,
}

/// subconv - subtitle format converter
///
/// Converts subtitles between SubRip, WebVTT, TTAF1 and frame-timecoded
/// plain text, detecting the input format automatically.
#[derive(Parser, Debug)]
#[command(name = "subconv")]
#[command(version)]
#[command(about = "Subtitle format converter")]
#[command(long_about = "subconv detects the format of subtitle files and converts them to SubRip, WebVTT, TTAF1 or plain text.

EXAMPLES:
    subconv convert movie.srt movie.vtt -t webvtt     # Convert a single file
    subconv convert movie.txt movie.srt --framerate 30  # Frame-based input at 30 FPS
    subconv convert movie.srt movie.xml -t ttaf1 --template broadcast --title \"Movie\"
    subconv convert subs/ out/ -t webvtt              # Convert a whole directory
    subconv detect movie.xml                          # Print the detected format
    subconv completions bash > subconv.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, colour) = Self::style_for_level(record.level());

            // Diagnostics never go to stdout
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<ExitCode> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subconv", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Formats => {
            for (id, kind) in implementations() {
                println!("{:<8} .{:<4} {}", id, kind.extension(), kind.display_name());
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Detect { input } => {
            let detected = detect_provider_for_file(&input)
                .with_context(|| format!("Failed to read {:?}", input))?;
            println!("{}", detected.map_or("unknown", FormatKind::id));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Convert(args) => {
            let config = load_config(&cli.config_path, cli.log_level)?;
            run_convert(config, args)
        }
    }
}

fn load_config(config_path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;

    // Update log level in config if specified via command line
    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    Ok(config)
}

fn run_convert(config: Config, args: ConvertArgs) -> Result<ExitCode> {
    let target = match args.format.as_deref() {
        Some(id) => FormatKind::from_id(id).ok_or_else(|| anyhow!("Unknown output format: {}", id))?,
        None => config.output_kind()?,
    };
    let format = target.id();

    let overrides = DocumentOverrides {
        framerate: args.framerate,
        language: args.language,
        template: args.template,
        title: args.title,
        copyright: args.copyright,
    };
    let controller = Controller::with_config(config)?.with_overrides(overrides);

    if args.input.is_dir() {
        let summary = controller.convert_folder(&args.input, &args.output, format, args.bom)?;
        info!(
            "{} converted, {} skipped, {} failed",
            summary.converted, summary.skipped, summary.failed
        );
        return Ok(if summary.failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    if controller.convert(&args.input, &args.output, format, args.bom) {
        info!("Success: {}", args.output.display());
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
