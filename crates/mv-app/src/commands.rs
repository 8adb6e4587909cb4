//! Commands typed at the explorer prompt

use clap::{Parser, Subcommand};
use mv_core::{ChartTab, SearchField, SortColumn};

/// One line of prompt input
#[derive(Debug, Parser)]
#[command(name = "meteorite-explorer", no_binary_name = true, disable_version_flag = true)]
#[command(override_usage = "<COMMAND> [ARGS]")]
struct PromptLine {
    #[command(subcommand)]
    command: Command,
}

/// Prompt commands
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Filter the list by one field; no query clears that field
    #[command(visible_alias = "s")]
    Search {
        /// name, year, composition or mass
        field: SearchField,

        /// Query text; may contain spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        query: Vec<String>,
    },

    /// Remove every filter
    Clear,

    /// Sort by a column; repeat to flip the direction
    Sort {
        /// name, recclass, mass, year, fall, nametype or id
        column: SortColumn,
    },

    /// Jump to a page
    #[command(visible_alias = "p")]
    Page { number: usize },

    /// Next page
    #[command(visible_alias = "n")]
    Next,

    /// Previous page
    #[command(visible_alias = "previous")]
    Prev,

    /// Summary chart for the filtered strikes
    #[command(visible_alias = "c")]
    Chart {
        /// number, mass, year or recclass
        tab: Option<ChartTab>,
    },

    /// List strike locations
    Map,

    /// Redraw the current page
    Show,

    /// Exit
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

/// Parse one prompt line. A blank line redraws the page.
///
/// `help` and malformed input come back as a [`clap::Error`] that prints
/// itself.
pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Command::Show);
    }
    PromptLine::try_parse_from(words).map(|prompt| prompt.command)
}
