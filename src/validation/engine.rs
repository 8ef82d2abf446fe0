//! Validation Engine
//!
//! Roster composition rules. One counting pass produces a
//! `CompositionSummary`; the rules are evaluated over that summary only, so
//! live feedback and the submission gate always agree.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::format::RuleSet;
use crate::player::{Player, PlayerId, Role};

/// Input that must be rejected before any rule is evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Player {id} appears more than once in the selection")]
    DuplicatePlayer { id: PlayerId },

    #[error("Unknown player role '{0}'")]
    UnknownRole(String),
}

/// Composition rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rule {
    SquadSize,
    OverseasCap,
    BowlingCap,
    WicketkeeperMinimum,
}

/// A broken composition rule with its user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: Rule,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message)
    }
}

/// Counts over a candidate set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompositionSummary {
    pub total: usize,
    pub role_counts: BTreeMap<Role, usize>,
    pub overseas: usize,
}

impl CompositionSummary {
    pub fn role_count(&self, role: Role) -> usize {
        self.role_counts.get(&role).copied().unwrap_or(0)
    }

    pub fn bowling_capable(&self) -> usize {
        self.role_counts
            .iter()
            .filter(|(role, _)| role.is_bowling_capable())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn wicketkeepers(&self) -> usize {
        self.role_count(Role::Wicketkeeper)
    }
}

/// Outcome of validating a candidate set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationVerdict {
    pub legal: bool,
    pub violations: Vec<Violation>,
    pub summary: CompositionSummary,
}

impl ValidationVerdict {
    fn new(summary: CompositionSummary) -> Self {
        Self {
            legal: true,
            violations: Vec::new(),
            summary,
        }
    }

    fn add_violation(&mut self, rule: Rule, message: String) {
        self.violations.push(Violation { rule, message });
        self.legal = false;
    }

    pub fn is_legal(&self) -> bool {
        self.legal
    }

    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}

/// Count roles and overseas players in a single pass.
///
/// Never fails and accepts any number of players, including an incomplete
/// or oversized selection.
pub fn summarize(candidates: &[Player], rules: &RuleSet) -> CompositionSummary {
    let mut summary = CompositionSummary::default();

    for player in candidates {
        summary.total += 1;
        *summary.role_counts.entry(player.role).or_insert(0) += 1;
        if player.is_overseas(&rules.home_country) {
            summary.overseas += 1;
        }
    }

    summary
}

/// Apply every rule to a summary. No rule short-circuits another.
pub fn evaluate(summary: CompositionSummary, rules: &RuleSet) -> ValidationVerdict {
    let squad_size = summary.total;
    let overseas = summary.overseas;
    let bowling = summary.bowling_capable();
    let keepers = summary.wicketkeepers();

    let mut verdict = ValidationVerdict::new(summary);

    if squad_size != rules.squad_size {
        verdict.add_violation(
            Rule::SquadSize,
            format!("Team must have exactly {} players.", rules.squad_size),
        );
    }

    if overseas > rules.max_overseas {
        verdict.add_violation(
            Rule::OverseasCap,
            format!(
                "Maximum {} overseas players allowed.",
                rules.max_overseas
            ),
        );
    }

    if bowling > rules.max_bowlers {
        verdict.add_violation(
            Rule::BowlingCap,
            format!("Maximum {} bowlers allowed.", rules.max_bowlers),
        );
    }

    if keepers < rules.min_wicketkeepers {
        let noun = if rules.min_wicketkeepers == 1 {
            "wicketkeeper"
        } else {
            "wicketkeepers"
        };
        verdict.add_violation(
            Rule::WicketkeeperMinimum,
            format!("At least {} {} required.", rules.min_wicketkeepers, noun),
        );
    }

    verdict
}

/// Validate a candidate set against a rule set.
///
/// Duplicate player ids are a precondition failure; rule violations are
/// returned inside the verdict.
pub fn validate(
    candidates: &[Player],
    rules: &RuleSet,
) -> Result<ValidationVerdict, PreconditionError> {
    check_distinct(candidates)?;

    let verdict = evaluate(summarize(candidates, rules), rules);
    log::debug!(
        "Validated {} players: legal={} violations={}",
        verdict.summary.total,
        verdict.legal,
        verdict.violations.len()
    );
    Ok(verdict)
}

fn check_distinct(candidates: &[Player]) -> Result<(), PreconditionError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for player in candidates {
        if !seen.insert(player.id) {
            return Err(PreconditionError::DuplicatePlayer { id: player.id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, country: &str, role: Role) -> Player {
        Player::new(id, format!("Player {}", id), country, role)
    }

    #[test]
    fn test_empty_selection() {
        let verdict = validate(&[], &RuleSet::default()).unwrap();
        assert!(!verdict.is_legal());
        assert_eq!(
            verdict.messages(),
            vec![
                "Team must have exactly 11 players.",
                "At least 1 wicketkeeper required."
            ]
        );
        assert_eq!(verdict.summary, CompositionSummary::default());
    }

    #[test]
    fn test_summary_counts() {
        let players = vec![
            player(1, "India", Role::Batter),
            player(2, "Australia", Role::Bowler),
            player(3, "England", Role::AllRounder),
            player(4, "India", Role::Wicketkeeper),
        ];
        let summary = summarize(&players, &RuleSet::default());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.overseas, 2);
        assert_eq!(summary.bowling_capable(), 2);
        assert_eq!(summary.wicketkeepers(), 1);
        assert_eq!(summary.role_count(Role::Batter), 1);
        assert_eq!(summary.role_counts.len(), 4);
    }

    #[test]
    fn test_absent_roles_not_in_summary() {
        let players = vec![player(1, "India", Role::Batter)];
        let summary = summarize(&players, &RuleSet::default());
        assert_eq!(summary.role_counts.len(), 1);
        assert_eq!(summary.role_count(Role::Bowler), 0);
    }

    #[test]
    fn test_duplicate_rejected() {
        let players = vec![
            player(7, "India", Role::Batter),
            player(7, "India", Role::Batter),
        ];
        let err = validate(&players, &RuleSet::default()).unwrap_err();
        assert_eq!(err, PreconditionError::DuplicatePlayer { id: PlayerId(7) });
    }

    #[test]
    fn test_plural_keeper_message() {
        let rules = RuleSet {
            min_wicketkeepers: 2,
            ..RuleSet::default()
        };
        let verdict = validate(&[], &rules).unwrap();
        assert!(verdict
            .messages()
            .contains(&"At least 2 wicketkeepers required."));
    }

    #[test]
    fn test_verdict_serializes_messages() {
        let verdict = validate(&[player(1, "India", Role::Batter)], &RuleSet::default()).unwrap();
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["legal"], false);
        assert_eq!(json["violations"][0], "Team must have exactly 11 players.");
        assert_eq!(json["summary"]["role_counts"]["Batter"], 1);
        assert_eq!(json["summary"]["overseas"], 0);
    }
}
