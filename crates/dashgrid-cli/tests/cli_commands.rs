//! Subcommand dispatch against state files in temporary directories.

use std::path::{Path, PathBuf};

use dashgrid_cli::cli::{AddArgs, CapacityArgs, InitArgs};
use dashgrid_cli::{Cli, CliError, Commands, GlobalArgs, run, store};
use dashgrid_layout::{Cell, GridRejection, WidgetKind};

fn global(path: &Path) -> GlobalArgs {
    GlobalArgs {
        state: path.to_path_buf(),
        json: false,
        log_json: false,
    }
}

fn exec(path: &Path, command: Commands) -> Result<(), CliError> {
    run(Cli {
        global: global(path),
        command,
    })
}

fn init_default(path: &Path) {
    exec(
        path,
        Commands::Init(InitArgs {
            rows: 3,
            cols: 3,
            capacity: None,
            viewport_width: None,
            force: false,
        }),
    )
    .expect("init should succeed");
}

fn add(path: &Path, kind: &str, size: Option<&str>) -> Result<(), CliError> {
    exec(
        path,
        Commands::Add(AddArgs {
            kind: kind.to_string(),
            size: size.map(str::to_string),
        }),
    )
}

fn state_path() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grid.json");
    (dir, path)
}

#[test]
fn init_creates_padded_grid() {
    let (_dir, path) = state_path();
    init_default(&path);

    let state = store::load(&path).unwrap();
    assert_eq!(state.widgets().len(), 9);
    assert_eq!(state.capacity(), 9);
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "clock", None).unwrap();

    let err = exec(
        &path,
        Commands::Init(InitArgs {
            rows: 2,
            cols: 2,
            capacity: None,
            viewport_width: None,
            force: false,
        }),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::StateExists { .. }));
    assert_eq!(store::load(&path).unwrap().real_widgets().count(), 1);
}

#[test]
fn init_from_viewport_width_sets_capacity() {
    let (_dir, path) = state_path();
    exec(
        &path,
        Commands::Init(InitArgs {
            rows: 3,
            cols: 3,
            capacity: None,
            viewport_width: Some(800),
            force: false,
        }),
    )
    .unwrap();
    assert_eq!(store::load(&path).unwrap().capacity(), 6);
}

#[test]
fn add_then_remove_round_trip() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "calendar", None).unwrap();

    let state = store::load(&path).unwrap();
    let calendar = state.real_widgets().next().unwrap();
    assert_eq!(calendar.kind, WidgetKind::Calendar);
    assert_eq!(calendar.anchor(), Cell::new(0, 0));

    exec(
        &path,
        Commands::Remove {
            id: calendar.id.to_string(),
        },
    )
    .unwrap();
    let state = store::load(&path).unwrap();
    assert_eq!(state.real_widgets().count(), 0);
    assert_eq!(state.widgets().len(), 9);
}

#[test]
fn rejected_add_leaves_file_untouched() {
    let (_dir, path) = state_path();
    exec(
        &path,
        Commands::Init(InitArgs {
            rows: 3,
            cols: 3,
            capacity: Some(2),
            viewport_width: None,
            force: false,
        }),
    )
    .unwrap();
    add(&path, "quote", None).unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = add(&path, "clock", None).unwrap_err();
    assert!(matches!(
        err,
        CliError::Rejection(GridRejection::CapacityExceeded { .. })
    ));
    assert_eq!(err.exit_code(), 4);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn unknown_kind_is_an_argument_error() {
    let (_dir, path) = state_path();
    init_default(&path);
    let err = add(&path, "toaster", None).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn malformed_size_falls_back_to_one_block() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "quote", Some("wide")).unwrap();
    let state = store::load(&path).unwrap();
    assert_eq!(state.used_blocks(), 1);
}

#[test]
fn toggle_hides_and_shows() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "notes", None).unwrap();
    let id = store::load(&path).unwrap().real_widgets().next().unwrap().id.to_string();

    exec(&path, Commands::Toggle { id: id.clone() }).unwrap();
    assert_eq!(store::load(&path).unwrap().used_blocks(), 0);

    exec(&path, Commands::Toggle { id }).unwrap();
    assert_eq!(store::load(&path).unwrap().used_blocks(), 2);
}

#[test]
fn settings_accept_json_and_plain_text() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "weather", None).unwrap();
    let id = store::load(&path).unwrap().real_widgets().next().unwrap().id.clone();

    exec(
        &path,
        Commands::Settings {
            id: id.to_string(),
            value: Some(r#"{"city":"Oslo"}"#.to_string()),
        },
    )
    .unwrap();
    let state = store::load(&path).unwrap();
    assert_eq!(state.widget(&id).unwrap().settings.as_value()["city"], "Oslo");

    exec(
        &path,
        Commands::Settings {
            id: id.to_string(),
            value: Some("Bergen".to_string()),
        },
    )
    .unwrap();
    let state = store::load(&path).unwrap();
    assert_eq!(state.widget(&id).unwrap().settings.as_value(), "Bergen");

    let err = exec(
        &path,
        Commands::Settings {
            id: "spacer-2-2".to_string(),
            value: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CliError::Rejection(GridRejection::NotARealWidget { .. })
    ));
}

#[test]
fn swap_moves_widget_between_cells() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "clock", None).unwrap();
    exec(&path, Commands::Swap { source: 0, target: 8 }).unwrap();

    let state = store::load(&path).unwrap();
    assert_eq!(state.real_widgets().next().unwrap().anchor(), Cell::new(2, 2));

    let err = exec(&path, Commands::Swap { source: 0, target: 9 }).unwrap_err();
    assert!(matches!(
        err,
        CliError::Rejection(GridRejection::CellOutOfRange { .. })
    ));
}

#[test]
fn preset_replaces_grid() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "timer", None).unwrap();
    exec(
        &path,
        Commands::Preset {
            id: "planner".to_string(),
        },
    )
    .unwrap();

    let state = store::load(&path).unwrap();
    let mut kinds: Vec<&str> = state.real_widgets().map(|w| w.kind.as_str()).collect();
    kinds.sort_unstable();
    assert_eq!(kinds, ["agenda", "calendar", "clock"]);
    assert_eq!(state.used_blocks(), 8);

    let err = exec(
        &path,
        Commands::Preset {
            id: "nope".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn capacity_command_sets_and_reports() {
    let (_dir, path) = state_path();
    init_default(&path);
    exec(
        &path,
        Commands::Capacity(CapacityArgs {
            value: Some(40),
            viewport_width: None,
        }),
    )
    .unwrap();
    assert_eq!(store::load(&path).unwrap().capacity(), 9);

    exec(
        &path,
        Commands::Capacity(CapacityArgs {
            value: None,
            viewport_width: Some(320),
        }),
    )
    .unwrap();
    assert_eq!(store::load(&path).unwrap().capacity(), 3);
}

#[test]
fn validate_flags_hand_edited_overlap() {
    let (_dir, path) = state_path();
    init_default(&path);
    add(&path, "calendar", None).unwrap();
    add(&path, "clock", None).unwrap();
    assert!(exec(&path, Commands::Validate).is_ok());

    let text = std::fs::read_to_string(&path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for widget in value["widgets"].as_array_mut().unwrap() {
        if widget["type"] == "clock" {
            widget["layout"]["x"] = 1.into();
            widget["layout"]["y"] = 1.into();
        }
    }
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let err = exec(&path, Commands::Validate).unwrap_err();
    assert!(matches!(err, CliError::Snapshot(_)));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn commands_without_state_file_fail_cleanly() {
    let (_dir, path) = state_path();
    let err = exec(&path, Commands::Show).unwrap_err();
    assert!(matches!(err, CliError::StateMissing { .. }));
}

#[test]
fn read_only_commands_succeed() {
    let (_dir, path) = state_path();
    init_default(&path);
    for command in [Commands::Show, Commands::Presets, Commands::Kinds] {
        assert!(exec(&path, command).is_ok());
    }
}
