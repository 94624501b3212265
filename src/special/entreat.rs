//! Entreat (spec §4.4 table), Arverni base-game only: swap an enemy
//! mobile piece, or an enemy Ally, for an Arverni one.

use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::Region;
use crate::control;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common;

/// Replace one `kind` (Warband or Auxilia) belonging to `from` with an
/// Arverni piece of the same kind in `region`; if `from` is unavailable,
/// the foreign piece is simply removed. Costs 1 per region touched.
pub fn entreat_mobile(state: &mut State, region: Region, from: Faction, kind: PieceKind) -> Result<(), EngineError> {
    if from == Faction::Arverni {
        return Err(EngineError::InvalidAction { reason: "cannot Entreat Arverni's own pieces".into() });
    }
    common::spend(state, Faction::Arverni, crate::catalog::caps::ENTREAT_COST_PER_REGION)?;
    pieces::remove(state, region, from, kind, 1, true, None, None)?;
    let available = pieces::available(state, Faction::Arverni, kind);
    if available > 0 {
        pieces::place(state, region, Faction::Arverni, kind, 1, None, None, Some(PieceState::Hidden))?;
    }
    control::refresh_all(state);
    Ok(())
}

/// Replace an Aedui/Belgic/Germanic Ally with an Arverni one. Only legal
/// in an Arverni-Controlled region; never targets a Roman Ally or a
/// Citadel.
pub fn entreat_ally(state: &mut State, region: Region, from: Faction) -> Result<(), EngineError> {
    if from == Faction::Arverni || from == Faction::Romans {
        return Err(EngineError::InvalidAction { reason: "Entreat's Ally swap excludes Arverni and Roman Allies".into() });
    }
    if !control::is_controlled_by(state, region, Faction::Arverni) {
        return Err(EngineError::ProximityViolation { reason: "Entreat's Ally swap requires Arverni Control".into() });
    }
    common::spend(state, Faction::Arverni, crate::catalog::caps::ENTREAT_COST_PER_REGION)?;
    pieces::remove(state, region, from, PieceKind::Ally, 1, true, None, None)?;
    if pieces::available(state, Faction::Arverni, PieceKind::Ally) > 0 {
        pieces::place(state, region, Faction::Arverni, PieceKind::Ally, 1, None, None, None)?;
    }
    control::refresh_all(state);
    Ok(())
}
