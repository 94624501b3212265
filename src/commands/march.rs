//! March (spec §4.3.2), including the inline Harassment sub-procedure.

use crate::action::CmdParams;
use crate::battle::losses::resolve_losses;
use crate::catalog::pieces::PieceKind;
use crate::catalog::{caps, AdjacencyKind, Region};
use crate::control;
use crate::dice::DeterministicRng;
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use super::common;

const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];

fn validate_crossing(map: &Map, faction: Faction, kind: PieceKind, from: Region, to: Region) -> Result<(), EngineError> {
    match map.adjacency_kind(from, to) {
        Some(AdjacencyKind::Rhenus) if kind == PieceKind::Legion && faction == Faction::Romans => {
            Err(EngineError::ProximityViolation { reason: "Legions may not cross the Rhenus on March".into() })
        }
        Some(AdjacencyKind::Coastal) if kind == PieceKind::Legion => {
            Err(EngineError::ProximityViolation { reason: "Legions may not cross a coastal edge on March".into() })
        }
        Some(_) => Ok(()),
        None => Err(EngineError::ProximityViolation { reason: format!("{:?} is not adjacent to {:?}", from, to) }),
    }
}

/// Harassment: enemy Hidden Warbands exceeding the threshold in a region
/// just entered may inflict losses on the moving faction's pieces there,
/// one loss per threshold Warbands, owner-chosen, no rolls (spec §4.3.2).
pub(crate) fn apply_harassment(state: &mut State, region: Region, mover: Faction, rng: &mut DeterministicRng) -> Result<(), EngineError> {
    if mover == Faction::Germans {
        return Ok(());
    }
    for opposing in crate::power::Faction::ALL {
        if opposing == mover {
            continue;
        }
        let hidden = pieces::count_by_state(state, region, opposing, PieceKind::Warband, crate::catalog::pieces::PieceState::Hidden);
        if hidden < caps::HARASSMENT_WARBAND_THRESHOLD {
            continue;
        }
        let loss_count = hidden / caps::HARASSMENT_WARBAND_THRESHOLD;
        if loss_count == 0 {
            continue;
        }
        resolve_losses(state, region, mover, loss_count, true, rng, None)?;
    }
    Ok(())
}

/// March one group of `params.piece_kinds[0]` from `params.origin` along
/// `params.regions` (the ordered path of regions entered), dropping off
/// `params.counts[region]` pieces at each stop. The Leader, if named,
/// travels with the group to the final region. Returns resources spent.
pub fn march(state: &mut State, map: &Map, faction: Faction, params: &CmdParams, rng: &mut DeterministicRng) -> Result<u32, EngineError> {
    if common::frost_blocks_march(state) {
        return Err(EngineError::FrostRestriction { reason: "March is unavailable under Frost".into() });
    }
    let origin = params.origin.ok_or_else(|| EngineError::InvalidAction { reason: "march requires an origin".into() })?;
    let kind = *params.piece_kinds.first().ok_or_else(|| EngineError::InvalidAction {
        reason: "march requires at least one piece kind".into(),
    })?;
    if params.regions.is_empty() {
        return Err(EngineError::InvalidAction { reason: "march requires at least one region in the path".into() });
    }

    let mut total_cost = 0;
    let mut current = origin;
    for &next in &params.regions {
        let in_germania = GERMANIA.contains(&next);
        total_cost += caps::march_cost(faction, in_germania);
        current = next;
    }
    let _ = current;
    common::spend(state, faction, total_cost)?;

    let mut carried = pieces::count_by_state(state, origin, faction, kind, crate::catalog::pieces::PieceState::Hidden)
        + pieces::count_by_state(state, origin, faction, kind, crate::catalog::pieces::PieceState::Revealed)
        + pieces::count_by_state(state, origin, faction, kind, crate::catalog::pieces::PieceState::Scouted);
    if kind == PieceKind::Legion {
        carried = pieces::count(state, origin, faction, kind);
    }
    if let Some(&leave) = params.counts.get(&origin) {
        carried = carried.saturating_sub(leave);
    }

    let mut current_region = origin;
    for &next in &params.regions {
        validate_crossing(map, faction, kind, current_region, next)?;
        if carried > 0 {
            pieces::move_pieces(state, current_region, next, faction, kind, carried, None)?;
        }
        apply_harassment(state, next, faction, rng)?;
        current_region = next;
        let drop = *params.counts.get(&next).unwrap_or(&0);
        carried = carried.saturating_sub(drop.min(carried));
        if carried == 0 {
            break;
        }
    }

    if let Some(leader) = params.leader {
        if leader.faction() == faction && pieces::leader_in_region(state, origin, faction) == Some(leader) {
            let destination = *params.regions.last().unwrap();
            if origin != destination {
                pieces::move_pieces(state, origin, destination, faction, PieceKind::Leader, 1, None)?;
            }
        }
    }

    // Pieces that began Hidden and crossed into a region holding an
    // opposing faction become Revealed (they were seen marching in).
    if kind.is_flippable() {
        if let Some(last) = params.regions.last() {
            let has_enemy = state
                .regions
                .get(last)
                .map(|c| c.pieces.iter().any(|(f, fp)| *f != faction && !fp.is_empty()))
                .unwrap_or(false);
            let hidden_here = pieces::count_by_state(state, *last, faction, kind, crate::catalog::pieces::PieceState::Hidden);
            if has_enemy && hidden_here > 0 {
                pieces::flip(state, *last, faction, kind, hidden_here, crate::catalog::pieces::PieceState::Hidden, crate::catalog::pieces::PieceState::Revealed)?;
            }
        }
    }
    control::refresh_all(state);
    Ok(total_cost)
}
