//! Roster Storage
//!
//! Persistence contract for named rosters plus an in-memory implementation.
//! Creating a roster and attaching its players is one unit: a failed create
//! leaves nothing behind.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterId(pub i64);

impl fmt::Display for RosterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account identity supplied by the authentication layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Roster {0} not found")]
    NotFound(RosterId),

    #[error("Not authorized to access roster {0}")]
    Unauthorized(RosterId),

    #[error("Invalid roster: {0}")]
    InvalidInput(String),

    #[error("Player {id} listed more than once")]
    Duplicate { id: PlayerId },

    #[error("Roster store unavailable")]
    Unavailable,
}

/// A saved roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub id: RosterId,
    pub name: String,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub player_ids: Vec<PlayerId>,
}

/// Listing entry for an owner's rosters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub id: RosterId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub player_count: usize,
}

pub trait RosterStore {
    fn create_roster(
        &self,
        name: &str,
        owner: OwnerId,
        player_ids: &[PlayerId],
    ) -> Result<Roster, StoreError>;

    /// Fetch a roster. When `viewer` is given it must be the owner.
    fn get_roster(&self, id: RosterId, viewer: Option<OwnerId>) -> Result<Roster, StoreError>;

    fn delete_roster(&self, id: RosterId, owner: OwnerId) -> Result<(), StoreError>;

    /// Rosters owned by `owner`, newest first
    fn list_rosters_for_owner(&self, owner: OwnerId) -> Result<Vec<RosterSummary>, StoreError>;
}

#[derive(Debug, Clone)]
struct RosterRow {
    name: String,
    owner: OwnerId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    next_id: i64,
    rosters: BTreeMap<RosterId, RosterRow>,
    roster_players: BTreeMap<RosterId, Vec<PlayerId>>,
}

impl StoreState {
    fn assemble(&self, id: RosterId) -> Option<Roster> {
        let row = self.rosters.get(&id)?;
        Some(Roster {
            id,
            name: row.name.clone(),
            owner: row.owner,
            created_at: row.created_at,
            player_ids: self.roster_players.get(&id).cloned().unwrap_or_default(),
        })
    }
}

/// Roster store kept in process memory
#[derive(Debug)]
pub struct InMemoryRosterStore {
    squad_size: usize,
    state: RwLock<StoreState>,
}

impl InMemoryRosterStore {
    pub fn new(squad_size: usize) -> Self {
        Self {
            squad_size,
            state: RwLock::new(StoreState {
                next_id: 1,
                ..StoreState::default()
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Unavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, StoreError> {
        self.state.write().map_err(|_| StoreError::Unavailable)
    }

    fn check_input(&self, name: &str, player_ids: &[PlayerId]) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidInput("name must not be empty".to_string()));
        }
        if player_ids.len() != self.squad_size {
            return Err(StoreError::InvalidInput(format!(
                "expected {} players, got {}",
                self.squad_size,
                player_ids.len()
            )));
        }
        let mut seen = HashSet::with_capacity(player_ids.len());
        for &id in player_ids {
            if !seen.insert(id) {
                return Err(StoreError::Duplicate { id });
            }
        }
        Ok(())
    }
}

impl RosterStore for InMemoryRosterStore {
    fn create_roster(
        &self,
        name: &str,
        owner: OwnerId,
        player_ids: &[PlayerId],
    ) -> Result<Roster, StoreError> {
        self.check_input(name, player_ids)?;

        let mut state = self.write()?;
        let id = RosterId(state.next_id);
        state.next_id += 1;

        let row = RosterRow {
            name: name.trim().to_string(),
            owner,
            created_at: Utc::now(),
        };
        state.rosters.insert(id, row);
        state.roster_players.insert(id, player_ids.to_vec());

        log::info!(
            "Created roster {} '{}' for owner {}",
            id,
            name.trim(),
            owner
        );
        state.assemble(id).ok_or(StoreError::NotFound(id))
    }

    fn get_roster(&self, id: RosterId, viewer: Option<OwnerId>) -> Result<Roster, StoreError> {
        let state = self.read()?;
        let roster = state.assemble(id).ok_or(StoreError::NotFound(id))?;
        match viewer {
            Some(viewer) if viewer != roster.owner => Err(StoreError::Unauthorized(id)),
            _ => Ok(roster),
        }
    }

    fn delete_roster(&self, id: RosterId, owner: OwnerId) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let row = state.rosters.get(&id).ok_or(StoreError::NotFound(id))?;
        if row.owner != owner {
            return Err(StoreError::Unauthorized(id));
        }

        state.roster_players.remove(&id);
        state.rosters.remove(&id);
        log::info!("Deleted roster {} for owner {}", id, owner);
        Ok(())
    }

    fn list_rosters_for_owner(&self, owner: OwnerId) -> Result<Vec<RosterSummary>, StoreError> {
        let state = self.read()?;
        let mut rosters: Vec<RosterSummary> = state
            .rosters
            .iter()
            .filter(|(_, row)| row.owner == owner)
            .map(|(&id, row)| RosterSummary {
                id,
                name: row.name.clone(),
                created_at: row.created_at,
                player_count: state.roster_players.get(&id).map_or(0, Vec::len),
            })
            .collect();
        rosters.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rosters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<i64>) -> Vec<PlayerId> {
        range.map(PlayerId).collect()
    }

    #[test]
    fn test_create_and_get() {
        let store = InMemoryRosterStore::new(3);
        let roster = store
            .create_roster("  Chennai  ", OwnerId(1), &ids(1..4))
            .unwrap();
        assert_eq!(roster.id, RosterId(1));
        assert_eq!(roster.name, "Chennai");
        assert_eq!(roster.player_ids, ids(1..4));

        let fetched = store.get_roster(roster.id, Some(OwnerId(1))).unwrap();
        assert_eq!(fetched, roster);
        assert_eq!(store.get_roster(roster.id, None).unwrap(), roster);
    }

    #[test]
    fn test_ids_are_sequential() {
        let store = InMemoryRosterStore::new(1);
        let a = store.create_roster("A", OwnerId(1), &ids(1..2)).unwrap();
        let b = store.create_roster("B", OwnerId(1), &ids(1..2)).unwrap();
        assert_eq!(a.id, RosterId(1));
        assert_eq!(b.id, RosterId(2));
    }

    #[test]
    fn test_unavailable_error_message() {
        assert_eq!(StoreError::Unavailable.to_string(), "Roster store unavailable");
    }

    #[test]
    fn test_poisoned_lock_reports_unavailable() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryRosterStore::new(1));
        let roster = store.create_roster("Kept", OwnerId(1), &ids(1..2)).unwrap();

        let poisoner = Arc::clone(&store);
        let outcome = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("writer died holding the roster lock");
        })
        .join();
        assert!(outcome.is_err());
        assert!(store.state.is_poisoned());

        assert_eq!(
            store.list_rosters_for_owner(OwnerId(1)),
            Err(StoreError::Unavailable)
        );
        assert_eq!(
            store.create_roster("Lost", OwnerId(1), &ids(2..3)),
            Err(StoreError::Unavailable)
        );
        assert_eq!(
            store.get_roster(roster.id, None),
            Err(StoreError::Unavailable)
        );
        assert_eq!(
            store.delete_roster(roster.id, OwnerId(1)),
            Err(StoreError::Unavailable)
        );
    }
}
