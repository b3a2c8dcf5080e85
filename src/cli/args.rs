//! Flag-block parsing
//!
//! Everything after the first bare `--` on the command line belongs to the
//! engine, not to the target: help, trace, completion, separator override,
//! and the external-collaborator switches. Unlike the command tokens, this
//! block has a fixed grammar, so clap parses it.

use clap::Parser;

/// Flags recognized after the bare `--` marker
#[derive(Parser, Debug)]
#[command(name = "flag-block")]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct FlagArgs {
    /// Render the synopsis for the resolved component and exit
    #[arg(long, short = 'h')]
    pub help: bool,

    /// Render the full resolution trace and exit
    #[arg(long, short = 't')]
    pub trace: bool,

    /// Emit a shell completion script and exit
    #[arg(long)]
    pub completion: bool,

    /// Token that closes argument consumption for the current call
    #[arg(long, default_value = "-")]
    pub separator: String,

    /// Start an interactive session (external collaborator)
    #[arg(long)]
    pub interactive: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

/// Parse the flag-tokens block
pub fn parse_flag_block(tokens: &[String]) -> Result<FlagArgs, clap::Error> {
    FlagArgs::try_parse_from(tokens)
}
