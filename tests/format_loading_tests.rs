//! Loading squad formats from directories
use std::fs;

use cricket_roster::format::{FormatPriority, FormatRegistry};
use cricket_roster::player::{Player, Role};
use cricket_roster::validation::validate;
use tempfile::TempDir;

const CUSTOM_FORMAT: &str = r#"
[format]
name = "county"
description = "County championship eleven"

[rules]
squad_size = 11
home_country = "England"
max_overseas = 2
max_bowlers = 5
min_wicketkeepers = 1
"#;

const T20_OVERRIDE: &str = r#"
[format]
name = "t20"
version = "workspace"

[rules]
squad_size = 11
home_country = "India"
max_overseas = 3
max_bowlers = 5
min_wicketkeepers = 1
"#;

#[test]
fn test_loads_format_files_from_directory() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("county.roster-format.toml"), CUSTOM_FORMAT).expect("write");
    fs::write(dir.path().join("notes.txt"), "not a format").expect("write");

    let mut registry = FormatRegistry::with_builtin_formats();
    let loaded = registry.load_from_directory(dir.path(), FormatPriority::UserGlobal);
    assert_eq!(loaded, 1);
    assert_eq!(registry.list_formats(), vec!["county", "odi", "t20"]);

    let county = registry.get_format("county").expect("county format");
    assert_eq!(county.priority, FormatPriority::UserGlobal);
    assert_eq!(
        county.source_path.as_deref(),
        Some(dir.path().join("county.roster-format.toml").as_path())
    );
}

#[test]
fn test_workspace_format_overrides_builtin() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("t20.roster-format.toml"), T20_OVERRIDE).expect("write");

    let mut registry = FormatRegistry::with_builtin_formats();
    registry.load_from_directory(dir.path(), FormatPriority::Workspace);

    let t20 = registry.get_format("t20").expect("t20");
    assert_eq!(t20.priority, FormatPriority::Workspace);
    assert_eq!(t20.format.version.as_deref(), Some("workspace"));
    assert_eq!(registry.active_rules().max_overseas, 3);
}

#[test]
fn test_user_format_does_not_override_workspace() {
    let workspace = TempDir::new().expect("tempdir");
    let user = TempDir::new().expect("tempdir");
    fs::write(workspace.path().join("t20.roster-format.toml"), T20_OVERRIDE).expect("write");
    fs::write(
        user.path().join("t20.roster-format.toml"),
        T20_OVERRIDE.replace("max_overseas = 3", "max_overseas = 1"),
    )
    .expect("write");

    let mut registry = FormatRegistry::with_builtin_formats();
    registry.load_from_directory(workspace.path(), FormatPriority::Workspace);
    let loaded = registry.load_from_directory(user.path(), FormatPriority::UserGlobal);

    assert_eq!(loaded, 0);
    assert_eq!(registry.active_rules().max_overseas, 3);
}

#[test]
fn test_broken_files_are_skipped() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("broken.roster-format.toml"), "[format\nname=").expect("write");
    fs::write(
        dir.path().join("impossible.roster-format.toml"),
        CUSTOM_FORMAT.replace("county", "impossible").replace("squad_size = 11", "squad_size = 0"),
    )
    .expect("write");
    fs::write(dir.path().join("county.roster-format.toml"), CUSTOM_FORMAT).expect("write");

    let mut registry = FormatRegistry::new();
    let loaded = registry.load_from_directory(dir.path(), FormatPriority::Workspace);
    assert_eq!(loaded, 1);
    assert_eq!(registry.list_formats(), vec!["county"]);
}

#[test]
fn test_odi_format_allows_no_overseas_players() {
    let mut registry = FormatRegistry::with_builtin_formats();
    assert!(registry.set_active_format("odi"));

    let mut players = vec![Player::new(1, "Keeper", "India", Role::Wicketkeeper)];
    for id in 2..=10 {
        players.push(Player::new(id, format!("Bat {}", id), "India", Role::Batter));
    }
    players.push(Player::new(11, "Visitor", "New Zealand", Role::Bowler));

    let verdict = validate(&players, &registry.active_rules()).expect("validate");
    assert_eq!(verdict.messages(), vec!["Maximum 0 overseas players allowed."]);
}
