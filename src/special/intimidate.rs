//! Intimidate (spec §4.4 table), Germans (Ariovistus) only.

use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::{Marker, Region};
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

pub fn intimidate(state: &mut State, region: Region, flips: u32, target: Faction, losses: &[PieceKind]) -> Result<(), EngineError> {
    if !(1..=2).contains(&flips) {
        return Err(EngineError::InvalidAction { reason: "Intimidate flips either 1 or 2 Hidden Germanic Warbands".into() });
    }
    if pieces::leader_in_region(state, region, target).is_some() {
        return Err(EngineError::InvalidAction { reason: "Intimidate cannot target a faction with a Leader in the region".into() });
    }
    if losses.len() as u32 != flips {
        return Err(EngineError::InvalidAction { reason: "Intimidate removes exactly one piece per flipped Warband".into() });
    }
    let hidden = pieces::count_by_state(state, region, Faction::Germans, PieceKind::Warband, PieceState::Hidden);
    if flips > hidden {
        return Err(EngineError::InvalidAction { reason: "not enough Hidden Germanic Warbands for Intimidate".into() });
    }
    pieces::flip(state, region, Faction::Germans, PieceKind::Warband, flips, PieceState::Hidden, PieceState::Revealed)?;
    for &kind in losses {
        if !matches!(kind, PieceKind::Warband | PieceKind::Auxilia | PieceKind::Ally) {
            return Err(EngineError::InvalidAction { reason: "Intimidate only removes Warbands, Auxilia, or Allies".into() });
        }
        pieces::remove(state, region, target, kind, 1, true, None, None)?;
    }
    state.regions.entry(region).or_default().set_marker(Marker::Intimidated);
    Ok(())
}
