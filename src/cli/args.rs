//! CLI argument definitions using clap

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;
use crate::domain::ItemId;

/// Query and reshape a flat parent-linked item list as a tree
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (TOML), layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Reject duplicate ids, dangling parents and cycles
    #[arg(long, global = true)]
    pub strict: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every item with its path
    All {
        /// JSON array of items
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print one item
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Item id (numeric text is read as an integer id; quote it, '"7"', for a string id)
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Print the direct children of an item
    Children {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Print every descendant of an item, breadth-first
    Descendants {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Print the ancestors of an item, root first
    Ancestors {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Print items without a resolvable parent
    Roots {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the grid path of every row, one per line
    Paths {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show the hierarchy as a tree
    Tree {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Report dangling parents and cyclic ancestry
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Add an item and print the result (input file is not modified)
    Add {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Item as JSON, e.g. '{"id": 9, "parent": 4, "label": "x"}'
        item: String,
    },

    /// Merge fields into an item and print the result (input file is not modified)
    Update {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Partial item as JSON; must contain "id"
        patch: String,
    },

    /// Remove an item with its subtree and print the result (input file is not modified)
    Remove {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(value_parser = parse_item_id)]
        id: ItemId,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Print the global config file location
    Path,
}

/// Ids on the command line: numeric text is an integer id, anything else a string id.
/// Double quotes force a string id, so `'"007"'` addresses `"007"` rather than `7`.
fn parse_item_id(raw: &str) -> Result<ItemId, Infallible> {
    match raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(quoted) => Ok(ItemId::Str(quoted.to_string())),
        None => raw.parse(),
    }
}
