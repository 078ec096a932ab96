use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

impl VerbosityLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset
    pub fn log_filter(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

/// Format, validate and transform XML documents
#[derive(Parser, Debug, Clone)]
#[command(name = "xml-studio")]
#[command(about = "Format, minify and validate XML, with AI-assisted repair and conversion")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML or JSON)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Disable colored status output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Gemini API key (overrides GEMINI_API_KEY)
    #[arg(long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// Model used for AI operations
    #[arg(long = "model", global = true)]
    pub model: Option<String>,

    /// AI request timeout in seconds
    #[arg(long = "timeout", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Check that the input is well-formed
    Validate(InputArgs),
    /// Pretty-print the input
    Format(TransformArgs),
    /// Collapse whitespace between tags
    Minify(TransformArgs),
    /// Ask the AI to fix malformed XML ("Smart Fix")
    Repair(TransformArgs),
    /// Ask the AI to convert XML to JSON
    Convert(TransformArgs),
    /// Ask the AI for a sample document
    Generate,
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct InputArgs {
    /// Input file (.xml or .txt); reads stdin when absent or "-"
    pub input: Option<PathBuf>,
}

impl InputArgs {
    /// The input file, or `None` for stdin
    pub fn path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|path| *path != Path::new("-"))
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq, Default)]
pub struct TransformArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Save the result as formatted.xml / formatted.json in this directory
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        VerbosityLevel::from_flags(self.verbose, self.quiet)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.timeout
            && timeout == 0
        {
            return Err("Timeout must be greater than 0".to_string());
        }
        if let Some(dir) = self.output_dir()
            && !dir.is_dir()
        {
            return Err(format!("Output directory does not exist: {}", dir.display()));
        }
        Ok(())
    }

    /// Input arguments of the chosen subcommand, if it takes any
    pub fn input(&self) -> Option<&InputArgs> {
        match &self.command {
            Command::Validate(args) => Some(args),
            Command::Format(args)
            | Command::Minify(args)
            | Command::Repair(args)
            | Command::Convert(args) => Some(&args.input),
            Command::Generate => None,
        }
    }

    pub fn output_dir(&self) -> Option<&Path> {
        match &self.command {
            Command::Format(args)
            | Command::Minify(args)
            | Command::Repair(args)
            | Command::Convert(args) => args.output.as_deref(),
            Command::Validate(_) | Command::Generate => None,
        }
    }

    /// Whether the subcommand talks to the remote collaborator
    pub fn needs_ai(&self) -> bool {
        matches!(
            self.command,
            Command::Repair(_) | Command::Convert(_) | Command::Generate
        )
    }
}
