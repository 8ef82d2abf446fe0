//! Player Catalog
//!
//! Read-only source of player records. The in-memory catalog loads a JSON
//! array of players and answers filtered listings sorted by name.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::player::{Player, PlayerId, RecordError, Role};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read player catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse player catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Player id {0} appears more than once in the catalog")]
    DuplicateId(PlayerId),

    #[error("Invalid player record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("Unknown player id {0}")]
    UnknownPlayer(PlayerId),
}

/// Optional listing filters; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFilter {
    pub country: Option<String>,
    pub role: Option<Role>,
    /// Case-insensitive substring of the player name
    pub name_contains: Option<String>,
}

impl PlayerFilter {
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        self.name_contains = Some(text.into());
        self
    }

    pub fn matches(&self, player: &Player) -> bool {
        if let Some(country) = &self.country {
            if &player.country != country {
                return false;
            }
        }
        if let Some(role) = self.role {
            if player.role != role {
                return false;
            }
        }
        if let Some(text) = &self.name_contains {
            if !player.name.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

pub trait PlayerCatalog {
    /// Players matching `filter`, ordered by name
    fn list_players(&self, filter: &PlayerFilter) -> Vec<Player>;

    fn get_player(&self, id: PlayerId) -> Option<Player>;

    /// Look up every id, failing on the first one the catalog does not know
    fn resolve(&self, ids: &[PlayerId]) -> Result<Vec<Player>, CatalogError> {
        ids.iter()
            .map(|&id| self.get_player(id).ok_or(CatalogError::UnknownPlayer(id)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    players: HashMap<PlayerId, Player>,
}

impl InMemoryCatalog {
    pub fn new(players: Vec<Player>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(players.len());
        for player in players {
            player.check()?;
            let id = player.id;
            if by_id.insert(id, player).is_some() {
                return Err(CatalogError::DuplicateId(id));
            }
        }
        Ok(Self { players: by_id })
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let players: Vec<Player> = serde_json::from_str(content)?;
        Self::new(players)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        log::info!(
            "Loaded {} players from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl PlayerCatalog for InMemoryCatalog {
    fn list_players(&self, filter: &PlayerFilter) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        players.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        players
    }

    fn get_player(&self, id: PlayerId) -> Option<Player> {
        self.players.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": 1, "name": "Virat Kohli", "country": "India", "role": "Batsman", "batting_avg": 52.7},
        {"id": 2, "name": "Pat Cummins", "country": "Australia", "role": "Bowler", "bowling_avg": 22.1},
        {"id": 3, "name": "Ben Stokes", "country": "England", "role": "All-rounder"},
        {"id": 4, "name": "Rishabh Pant", "country": "India", "role": "Wicketkeeper", "image_url": null}
    ]"#;

    #[test]
    fn test_load_and_list_sorted_by_name() {
        let catalog = InMemoryCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 4);

        let names: Vec<String> = catalog
            .list_players(&PlayerFilter::default())
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec!["Ben Stokes", "Pat Cummins", "Rishabh Pant", "Virat Kohli"]
        );
    }

    #[test]
    fn test_filters() {
        let catalog = InMemoryCatalog::from_json_str(SAMPLE).unwrap();

        let indians = catalog.list_players(&PlayerFilter::default().country("India"));
        assert_eq!(indians.len(), 2);

        let keepers = catalog.list_players(&PlayerFilter::default().role(Role::Wicketkeeper));
        assert_eq!(keepers.len(), 1);
        assert_eq!(keepers[0].id, PlayerId(4));

        let both = catalog.list_players(
            &PlayerFilter::default()
                .country("India")
                .role(Role::Batter),
        );
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "Virat Kohli");

        let search = catalog.list_players(&PlayerFilter::default().name_contains("STOK"));
        assert_eq!(search.len(), 1);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let content = r#"[{"id": 1, "name": "X", "country": "India", "role": "Umpire"}]"#;
        let err = InMemoryCatalog::from_json_str(content).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(err.to_string().contains("Umpire"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"[
            {"id": 1, "name": "X", "country": "India", "role": "Bowler"},
            {"id": 1, "name": "Y", "country": "India", "role": "Batter"}
        ]"#;
        let err = InMemoryCatalog::from_json_str(content).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(PlayerId(1))));
    }

    #[test]
    fn test_resolve() {
        let catalog = InMemoryCatalog::from_json_str(SAMPLE).unwrap();
        let players = catalog.resolve(&[PlayerId(2), PlayerId(1)]).unwrap();
        assert_eq!(players[0].name, "Pat Cummins");

        let err = catalog.resolve(&[PlayerId(1), PlayerId(99)]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPlayer(PlayerId(99))));
    }

    #[test]
    fn test_negative_average_rejected() {
        let content = r#"[{"id": 7, "name": "X", "country": "India", "role": "Bowler", "bowling_avg": -3.5}]"#;
        let err = InMemoryCatalog::from_json_str(content).unwrap_err();
        match err {
            CatalogError::InvalidRecord(record) => {
                assert_eq!(record.id, PlayerId(7));
                assert_eq!(record.field, "bowling_avg");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        fs::write(&path, SAMPLE).unwrap();

        let catalog = InMemoryCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.get_player(PlayerId(3)).map(|p| p.role),
            Some(Role::AllRounder)
        );
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = InMemoryCatalog::from_json_file(&path).unwrap_err();
        match &err {
            CatalogError::Io { path: reported, source } => {
                assert!(reported.ends_with("absent.json"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().starts_with("Failed to read player catalog"));
    }
}
