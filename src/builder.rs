//! Team Builder Session
//!
//! Ties a roster name and a selection to the validator and the roster store.
//! Failed submissions never touch the session, so the user can fix the
//! problem and retry without re-selecting players.

use thiserror::Error;

use crate::catalog::{PlayerCatalog, PlayerFilter};
use crate::format::RuleSet;
use crate::player::{Player, PlayerId};
use crate::selection::{Selection, SelectionChange, SelectionError};
use crate::store::{OwnerId, Roster, RosterStore, StoreError};
use crate::validation::{CompositionSummary, ValidationVerdict, Violation};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("You must be signed in to save a team")]
    Unauthenticated,

    #[error("Team name required")]
    NameRequired,

    #[error("Team validation failed: {}", join_messages(.0))]
    Invalid(Vec<Violation>),

    #[error("Error saving team: {0}")]
    Store(#[from] StoreError),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone)]
pub struct TeamBuilder {
    name: String,
    selection: Selection,
}

impl TeamBuilder {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            name: String::new(),
            selection: Selection::new(rules),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn toggle_player(&mut self, player: Player) -> Result<SelectionChange, SelectionError> {
        let id = player.id;
        let change = self.selection.toggle(player);
        if let Err(e) = &change {
            log::debug!("Selection change for player {} rejected: {}", id, e);
        }
        change
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, SelectionError> {
        self.selection.remove(id)
    }

    pub fn summary(&self) -> CompositionSummary {
        self.selection.summary()
    }

    pub fn verdict(&self) -> ValidationVerdict {
        self.selection.verdict()
    }

    /// Catalog players matching `search` that are not yet selected
    pub fn available_players(&self, catalog: &dyn PlayerCatalog, search: &str) -> Vec<Player> {
        let filter = PlayerFilter::default().name_contains(search);
        catalog
            .list_players(&filter)
            .into_iter()
            .filter(|p| !self.selection.contains(p.id))
            .collect()
    }

    /// Validate and save the current selection under `owner`
    pub fn submit(
        &self,
        store: &dyn RosterStore,
        owner: Option<OwnerId>,
    ) -> Result<Roster, SubmitError> {
        let owner = owner.ok_or(SubmitError::Unauthenticated)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(SubmitError::NameRequired);
        }

        let verdict = self.verdict();
        if !verdict.is_legal() {
            return Err(SubmitError::Invalid(verdict.violations));
        }

        let roster = store.create_roster(name, owner, &self.selection.ids())?;
        Ok(roster)
    }
}
