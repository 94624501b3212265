//! Scout (spec §4.4 table), Romans only: (a) redeploy Auxilia across
//! single adjacencies, (b) near Caesar, mark enemy Warbands Scouted.

use std::collections::HashSet;

use crate::catalog::pieces::{Leader, PieceState};
use crate::catalog::{pieces::PieceKind, Region};
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

/// Move Auxilia one at a time across single adjacencies, preserving each
/// piece's state, never moving the same origin region's stack twice in
/// one call, and never crossing to/from Britannia.
pub fn redeploy(state: &mut State, map: &Map, moves: &[(Region, Region, PieceState, u32)]) -> Result<(), EngineError> {
    let mut used_origins = HashSet::new();
    for &(from, to, piece_state, count) in moves {
        if from == Region::Britannia || to == Region::Britannia {
            return Err(EngineError::ProximityViolation { reason: "Scout cannot cross to/from Britannia".into() });
        }
        if !map.is_adjacent(from, to) {
            return Err(EngineError::ProximityViolation { reason: format!("{:?} is not adjacent to {:?}", from, to) });
        }
        if !used_origins.insert(from) {
            return Err(EngineError::InvalidAction { reason: format!("{:?} already redeployed this Scout", from) });
        }
        pieces::move_pieces(state, from, to, Faction::Romans, PieceKind::Auxilia, count, Some(piece_state))?;
    }
    Ok(())
}

/// In regions within 1 of Caesar, flip up to `count` Hidden Auxilia and
/// place the Scouted marker on up to two enemy Warbands there per flip.
pub fn mark_scouted(state: &mut State, map: &Map, region: Region, flips: u32, targets: &[(Faction, u32)]) -> Result<(), EngineError> {
    let caesar_region = pieces::find_leader(state, Faction::Romans)
        .filter(|r| pieces::leader_in_region(state, *r, Faction::Romans) == Some(Leader::Caesar));
    let within_one = caesar_region.map(|c| c == region || map.is_adjacent(c, region)).unwrap_or(false);
    if !within_one {
        return Err(EngineError::ProximityViolation { reason: "Scouted marking requires Caesar within 1".into() });
    }
    let hidden = pieces::count_by_state(state, region, Faction::Romans, PieceKind::Auxilia, PieceState::Hidden);
    if flips == 0 || flips > hidden {
        return Err(EngineError::InvalidAction { reason: "not enough Hidden Auxilia to flip for Scout".into() });
    }
    let max_targets = (flips * 2) as usize;
    if targets.len() > max_targets {
        return Err(EngineError::InvalidAction { reason: "too many Scouted targets for the Auxilia flipped".into() });
    }
    pieces::flip(state, region, Faction::Romans, PieceKind::Auxilia, flips, PieceState::Hidden, PieceState::Revealed)?;
    for &(faction, count) in targets {
        pieces::flip(state, region, faction, PieceKind::Warband, count, PieceState::Hidden, PieceState::Scouted)?;
    }
    Ok(())
}
