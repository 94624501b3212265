//! Ambush (spec §4.4 table): validation only — the effect is realized by
//! `battle::resolve_battle`'s `is_ambush` flag.

use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::Region;
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common::leader_proximity_ok;

/// Validate that `attacker` may declare Ambush against `defender` in
/// `region`: the attacker's Hidden count must exceed the defender's, and
/// the attacker's named leader (or Successor) must satisfy the proximity
/// gate.
pub fn validate(state: &State, map: &Map, region: Region, attacker: Faction, defender: Faction, named_leader: Leader) -> Result<(), EngineError> {
    if attacker == Faction::Romans {
        return Err(EngineError::EligibilityViolation { reason: "Romans cannot Ambush".into() });
    }
    let attacker_hidden = hidden_total(state, region, attacker);
    let defender_hidden = hidden_total(state, region, defender);
    if attacker_hidden <= defender_hidden {
        return Err(EngineError::InvalidAction {
            reason: "Ambush requires more Hidden pieces than the defender".into(),
        });
    }
    if !leader_proximity_ok(state, map, region, attacker, named_leader) {
        return Err(EngineError::ProximityViolation { reason: "Ambush leader-proximity gate not satisfied".into() });
    }
    Ok(())
}

fn hidden_total(state: &State, region: Region, faction: Faction) -> u32 {
    pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden)
        + pieces::count_by_state(state, region, faction, PieceKind::Auxilia, PieceState::Hidden)
}
