//! Player Selection
//!
//! The candidate set a user builds interactively. Capacity is enforced here,
//! at the mutation boundary, so the validator never receives an oversized
//! selection from a builder.

use thiserror::Error;

use crate::format::RuleSet;
use crate::player::{Player, PlayerId};
use crate::validation::{self, CompositionSummary, ValidationVerdict};

/// Rejected selection change. The selection is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Team is full: you can only select {capacity} players for a team.")]
    SquadFull { capacity: usize },

    #[error("Player {id} is already selected")]
    AlreadySelected { id: PlayerId },

    #[error("Player {id} is not selected")]
    NotSelected { id: PlayerId },
}

/// What a toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added,
    Removed,
}

/// Duplicate-free set of selected players, kept in selection order
#[derive(Debug, Clone)]
pub struct Selection {
    players: Vec<Player>,
    rules: RuleSet,
}

impl Selection {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            players: Vec::new(),
            rules,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn capacity(&self) -> usize {
        self.rules.squad_size
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Remove the player if selected, otherwise add it when there is room
    pub fn toggle(&mut self, player: Player) -> Result<SelectionChange, SelectionError> {
        if self.contains(player.id) {
            self.remove(player.id)?;
            Ok(SelectionChange::Removed)
        } else {
            self.add(player)?;
            Ok(SelectionChange::Added)
        }
    }

    pub fn add(&mut self, player: Player) -> Result<(), SelectionError> {
        if self.contains(player.id) {
            return Err(SelectionError::AlreadySelected { id: player.id });
        }
        if self.is_full() {
            return Err(SelectionError::SquadFull {
                capacity: self.capacity(),
            });
        }
        self.players.push(player);
        Ok(())
    }

    pub fn remove(&mut self, id: PlayerId) -> Result<Player, SelectionError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(SelectionError::NotSelected { id })?;
        Ok(self.players.remove(index))
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Live composition counts for the current selection
    pub fn summary(&self) -> CompositionSummary {
        validation::summarize(&self.players, &self.rules)
    }

    /// Full verdict for the current selection
    pub fn verdict(&self) -> ValidationVerdict {
        // Players only enter through `add`, which refuses duplicates.
        validation::evaluate(self.summary(), &self.rules)
    }
}
