//! Rampage (spec §4.4 table), Belgae only.

use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::Region;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

/// Flip `flips` Hidden Belgic Warbands; `target` (no Leader, Citadel, or
/// Fort, and non-Germanic) loses or retreats one piece per flip. Losses
/// here are represented as direct removal — retreat is the caller's
/// alternative, handled by invoking `pieces::move_pieces` instead of
/// `pieces::remove` for the same kind/count.
pub fn rampage(state: &mut State, region: Region, target: Faction, losses: &[PieceKind]) -> Result<(), EngineError> {
    if target == Faction::Germans {
        return Err(EngineError::InvalidAction { reason: "Rampage cannot target Germans".into() });
    }
    if pieces::leader_in_region(state, region, target).is_some()
        || pieces::count(state, region, target, PieceKind::Citadel) > 0
        || pieces::count(state, region, target, PieceKind::Fort) > 0
    {
        return Err(EngineError::InvalidAction { reason: "Rampage cannot target a region with that faction's Leader, Citadel, or Fort".into() });
    }
    let flips = losses.len() as u32;
    if flips == 0 {
        return Err(EngineError::InvalidAction { reason: "Rampage requires at least one flip".into() });
    }
    let hidden = pieces::count_by_state(state, region, Faction::Belgae, PieceKind::Warband, PieceState::Hidden);
    if flips > hidden {
        return Err(EngineError::InvalidAction { reason: "not enough Hidden Belgic Warbands for Rampage".into() });
    }
    pieces::flip(state, region, Faction::Belgae, PieceKind::Warband, flips, PieceState::Hidden, PieceState::Revealed)?;
    for &kind in losses {
        pieces::remove(state, region, target, kind, 1, true, None, None)?;
    }
    Ok(())
}
