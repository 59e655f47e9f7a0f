use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "dashgrid",
    about = "Inspect and edit a dashboard widget grid stored as JSON",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Grid state file.
    #[arg(
        long,
        global = true,
        env = "DASHGRID_STATE",
        default_value = "dashgrid.json"
    )]
    pub state: PathBuf,

    /// Print machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit log records as JSON on stderr.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new empty grid.
    Init(InitArgs),

    /// Draw the grid and list its widgets.
    Show,

    /// Add a widget of the given kind.
    Add(AddArgs),

    /// Remove a widget; its cells become spacers.
    Remove { id: String },

    /// Change a widget's block size.
    Resize { id: String, size: String },

    /// Hide a shown widget or show a hidden one.
    Toggle { id: String },

    /// Print or replace a widget's settings payload.
    Settings {
        id: String,
        /// New payload (JSON; anything else is stored as a string).
        value: Option<String>,
    },

    /// Move a list entry and re-flow the grid.
    Reorder { from: usize, to: usize },

    /// Swap the blocks at two row-major cell indices.
    Swap { source: usize, target: usize },

    /// Replace the grid with a built-in preset.
    Preset { id: String },

    /// List built-in presets.
    Presets,

    /// Print or set the block capacity.
    Capacity(CapacityArgs),

    /// Check the state file and report arrangement issues.
    Validate,

    /// List widget kinds and their default sizes.
    Kinds,
}

#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub rows: u16,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=32))]
    pub cols: u16,

    /// Block budget (defaults to rows * cols).
    #[arg(long, conflicts_with = "viewport_width")]
    pub capacity: Option<u16>,

    /// Derive the budget from a viewport width in pixels.
    #[arg(long = "viewport-width")]
    pub viewport_width: Option<u32>,

    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Widget kind (see `dashgrid kinds`).
    pub kind: String,

    /// Size token such as `2x1`; malformed tokens mean `1x1`.
    #[arg(long)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CapacityArgs {
    /// New block budget.
    #[arg(conflicts_with = "viewport_width")]
    pub value: Option<u16>,

    /// Derive the budget from a viewport width in pixels.
    #[arg(long = "viewport-width")]
    pub viewport_width: Option<u32>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Init(args) => commands::init(global, &args),
        Commands::Show => commands::show(global),
        Commands::Add(args) => commands::add(global, &args),
        Commands::Remove { id } => commands::remove(global, id),
        Commands::Resize { id, size } => commands::resize(global, id, &size),
        Commands::Toggle { id } => commands::toggle(global, id),
        Commands::Settings { id, value } => commands::settings(global, id, value.as_deref()),
        Commands::Reorder { from, to } => commands::reorder(global, from, to),
        Commands::Swap { source, target } => commands::swap(global, source, target),
        Commands::Preset { id } => commands::preset(global, id),
        Commands::Presets => commands::presets(global),
        Commands::Capacity(args) => commands::capacity(global, &args),
        Commands::Validate => commands::validate(global),
        Commands::Kinds => commands::kinds(global),
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dashgrid", "add", "clock", "--size", "2x1", "--json"])
            .unwrap();
        assert!(cli.global.json);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.kind, "clock");
                assert_eq!(args.size.as_deref(), Some("2x1"));
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn capacity_and_viewport_conflict() {
        let err = Cli::try_parse_from(["dashgrid", "capacity", "4", "--viewport-width", "800"]);
        assert!(err.is_err());
    }

    #[test]
    fn init_rejects_zero_rows() {
        assert!(Cli::try_parse_from(["dashgrid", "init", "--rows", "0"]).is_err());
    }
}
