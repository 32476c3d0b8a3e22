//! Command dispatch and output rendering

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::{Item, ItemPatch, StoreError, TreeStore};
use crate::exitcode;
use crate::grid;
use crate::tree_traits::ToTermTree;

/// Rendered result of a store command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            exit_code: exitcode::OK,
        }
    }
}

/// Run the parsed command line, printing to stdout. Returns the exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    match &cli.command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(exitcode::OK)
        }
        Commands::Config { command } => {
            let settings = effective_settings(cli)?;
            output::data(&render_config(command, &settings)?);
            Ok(exitcode::OK)
        }
        command => {
            let settings = effective_settings(cli)?;
            let result = run(command, &settings)?;
            if result.exit_code == exitcode::FINDINGS {
                output::findings(&result.text);
            } else {
                output::data(&result.text);
            }
            Ok(result.exit_code)
        }
    }
}

/// Settings from config layers, with command-line flags applied last.
pub fn effective_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.strict {
        settings.strict = true;
    }
    if let Some(format) = cli.format {
        settings.format = format;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Execute a store command against its input file and render the result.
#[instrument(level = "debug", skip(settings))]
pub fn run(command: &Commands, settings: &Settings) -> CliResult<CommandOutput> {
    let rendered = match command {
        Commands::All { file } => {
            let store = load_store(file, settings.strict)?;
            render_rows(&store.get_all(), settings)?
        }
        Commands::Get { file, id } => {
            let store = load_store(file, settings.strict)?;
            let item = store
                .get_item(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            render_rows(&[item], settings)?
        }
        Commands::Children { file, id } => {
            let store = load_store(file, settings.strict)?;
            render_rows(&store.get_children(id), settings)?
        }
        Commands::Descendants { file, id } => {
            let store = load_store(file, settings.strict)?;
            render_rows(&store.get_all_children(id), settings)?
        }
        Commands::Ancestors { file, id } => {
            let store = load_store(file, settings.strict)?;
            render_rows(&store.get_all_parents(id), settings)?
        }
        Commands::Roots { file } => {
            let store = load_store(file, settings.strict)?;
            render_rows(&store.roots(), settings)?
        }
        Commands::Paths { file } => {
            let store = load_store(file, settings.strict)?;
            grid::row_data(&store)
                .iter()
                .map(|row| grid::path_label(row, &settings.path_separator))
                .join("\n")
        }
        Commands::Tree { file } => {
            let store = load_store(file, settings.strict)?;
            render_tree(&store)
        }
        Commands::Check { file } => return check(file),
        Commands::Add { file, item } => {
            let mut store = load_store(file, settings.strict)?;
            let item: Item = parse_argument(item, "item")?;
            if settings.strict {
                store.try_add_item(item)?;
            } else if !store.add_item(item) {
                warn!("item not added: id already present or parent link is cyclic");
            }
            render_rows(&store.get_all(), settings)?
        }
        Commands::Update { file, patch } => {
            let mut store = load_store(file, settings.strict)?;
            let patch: ItemPatch = parse_argument(patch, "patch")?;
            if settings.strict {
                store.try_update_item(patch)?;
            } else if !store.update_item(patch) {
                warn!("item not updated: unknown id or cyclic parent");
            }
            render_rows(&store.get_all(), settings)?
        }
        Commands::Remove { file, id } => {
            let mut store = load_store(file, settings.strict)?;
            let removed = store.remove_item(id);
            info!("removed: [{}]", removed.iter().join(", "));
            render_rows(&store.get_all(), settings)?
        }
        Commands::Config { .. } | Commands::Completion { .. } => {
            return Err(CliError::InvalidArgs("not a store command".to_string()));
        }
    };
    Ok(CommandOutput::ok(rendered))
}

/// Read a JSON array of items and build a store from it.
#[instrument(level = "debug")]
pub fn load_store(file: &Path, strict: bool) -> CliResult<TreeStore> {
    let content =
        std::fs::read_to_string(file).map_err(|e| CliError::io("read items", file, e))?;
    let items: Vec<Item> = serde_json::from_str(&content).map_err(|e| CliError::json(file, e))?;
    debug!("loaded {} item(s) from {}", items.len(), file.display());

    if strict {
        Ok(TreeStore::try_new(items)?)
    } else {
        Ok(TreeStore::new(items))
    }
}

fn parse_argument<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> CliResult<T> {
    serde_json::from_str(raw).map_err(|e| CliError::InvalidArgs(format!("{what}: {e}")))
}

fn check(file: &Path) -> CliResult<CommandOutput> {
    let store = load_store(file, false)?;
    let issues = store.integrity_issues();
    if issues.is_empty() {
        return Ok(CommandOutput::ok(format!("ok: {} item(s)", store.len())));
    }
    Ok(CommandOutput {
        text: issues.iter().map(ToString::to_string).join("\n"),
        exit_code: exitcode::FINDINGS,
    })
}

/// Render rows in the configured format.
pub fn render_rows(rows: &[Item], settings: &Settings) -> CliResult<String> {
    match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(rows).map_err(|e| CliError::Json {
            context: "output".to_string(),
            source: e,
        }),
        // rows whose parent is not part of the result become roots
        OutputFormat::Tree => Ok(render_tree(&TreeStore::new(rows.iter().cloned()))),
        OutputFormat::Table => Ok(rows
            .iter()
            .map(|row| {
                let fields = serde_json::Value::Object(row.fields.clone());
                format!(
                    "{:<32} {}",
                    grid::path_label(row, &settings.path_separator),
                    fields
                )
            })
            .join("\n")),
    }
}

fn render_tree(store: &TreeStore) -> String {
    store
        .to_term_trees()
        .iter()
        .map(|tree| tree.to_string().trim_end().to_string())
        .join("\n")
}

fn render_config(command: &ConfigCommands, settings: &Settings) -> CliResult<String> {
    match command {
        ConfigCommands::Show => settings.to_toml(),
        ConfigCommands::Template => Ok(Settings::template()),
        ConfigCommands::Path => Ok(global_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no config directory available".to_string())),
    }
}
