//! Roster Details
//!
//! Read view of a saved roster: its players resolved from the catalog, plus
//! the composition and statistics shown alongside them.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, PlayerCatalog};
use crate::format::RuleSet;
use crate::player::Player;
use crate::store::{OwnerId, Roster, RosterId, RosterStore, StoreError};
use crate::validation::{self, CompositionSummary};

#[derive(Debug, Error)]
pub enum DetailsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A saved roster with its players and team statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterDetails {
    pub roster: Roster,
    /// Resolved players, ordered by name
    pub players: Vec<Player>,
    pub summary: CompositionSummary,
    pub country_counts: BTreeMap<String, usize>,
    /// Mean over the players that have a batting average
    pub batting_avg: Option<f64>,
    /// Mean over the players that have a bowling average
    pub bowling_avg: Option<f64>,
    pub squad_size: usize,
    pub max_overseas: usize,
}

impl RosterDetails {
    pub fn overseas(&self) -> usize {
        self.summary.overseas
    }

    pub fn within_overseas_limit(&self) -> bool {
        self.summary.overseas <= self.max_overseas
    }

    /// Players still missing before the roster reaches the squad size
    pub fn players_needed(&self) -> usize {
        self.squad_size.saturating_sub(self.players.len())
    }

    /// "Complete team" or "N more needed"
    pub fn completion(&self) -> String {
        match self.players_needed() {
            0 => "Complete team".to_string(),
            n => format!("{} more needed", n),
        }
    }
}

/// Load a roster and resolve its players. `viewer` follows the store's
/// ownership rule for `get_roster`.
pub fn roster_details(
    store: &dyn RosterStore,
    catalog: &dyn PlayerCatalog,
    id: RosterId,
    viewer: Option<OwnerId>,
    rules: &RuleSet,
) -> Result<RosterDetails, DetailsError> {
    let roster = store.get_roster(id, viewer)?;
    let mut players = catalog.resolve(&roster.player_ids)?;
    players.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let summary = validation::summarize(&players, rules);

    let mut country_counts = BTreeMap::new();
    for player in &players {
        *country_counts.entry(player.country.clone()).or_insert(0) += 1;
    }

    let batting_avg = mean(players.iter().filter_map(|p| p.batting_avg));
    let bowling_avg = mean(players.iter().filter_map(|p| p.bowling_avg));

    Ok(RosterDetails {
        roster,
        players,
        summary,
        country_counts,
        batting_avg,
        bowling_avg,
        squad_size: rules.squad_size,
        max_overseas: rules.max_overseas,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
