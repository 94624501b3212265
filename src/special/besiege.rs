//! Besiege (spec §4.4 table): validates and names the one Citadel/Ally/
//! Settlement that `battle::resolve_battle` auto-removes before losses.

use crate::catalog::pieces::PieceKind;
use crate::catalog::Region;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

/// Picks the Besiege target kind, preferring a Citadel, then an Ally,
/// then (Ariovistus) a Settlement — the order in which the SA table lists
/// them. No leader-proximity gate applies.
pub fn choose_target(state: &State, region: Region, defender: Faction) -> Result<PieceKind, EngineError> {
    for kind in [PieceKind::Citadel, PieceKind::Ally, PieceKind::Settlement] {
        if pieces::count(state, region, defender, kind) > 0 {
            return Ok(kind);
        }
    }
    Err(EngineError::InvalidAction {
        reason: format!("{:?} has no Citadel, Ally, or Settlement in {:?} to besiege", defender, region),
    })
}

pub fn validate(attacker: Faction) -> Result<(), EngineError> {
    if attacker != Faction::Romans {
        return Err(EngineError::EligibilityViolation { reason: "only Romans may Besiege".into() });
    }
    Ok(())
}
