//! Shared cost/gate helpers used by every Command and Special Activity.

use crate::catalog::pieces::Leader;
use crate::catalog::{caps, Marker, Region};
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

pub fn spend(state: &mut State, faction: Faction, cost: u32) -> Result<(), EngineError> {
    let available = *state.resources.get(&faction).unwrap_or(&0);
    if available < cost {
        return Err(EngineError::ResourceShortfall { needed: cost, available });
    }
    state.resources.insert(faction, available - cost);
    Ok(())
}

pub fn gain(state: &mut State, faction: Faction, amount: u32) {
    let current = *state.resources.get(&faction).unwrap_or(&0);
    state.resources.insert(faction, (current + amount).min(caps::RESOURCE_CAP));
}

/// "Within-1 of its named Leader, or same-region as Successor" gate shared
/// by every Special Activity (spec §4.4 header).
pub fn leader_proximity_ok(state: &State, map: &Map, region: Region, faction: Faction, named_leader: Leader) -> bool {
    let Some(home) = pieces::find_leader(state, faction) else {
        return false;
    };
    let leader_here = pieces::leader_in_region(state, home, faction);
    if leader_here == Some(named_leader) {
        return home == region || map.is_adjacent(home, region);
    }
    // A Successor disc only ever satisfies same-region.
    matches!(leader_here, Some(Leader::Successor(_))) && home == region
}

/// Intimidated regions (Ariovistus) block non-Germanic Recruit/Rally by a
/// faction with no Leader present (spec §4.3.1).
pub fn intimidated_blocks(state: &State, region: Region, faction: Faction) -> bool {
    if faction == Faction::Germans {
        return false;
    }
    let marked = state.regions.get(&region).map(|c| c.has_marker(Marker::Intimidated)).unwrap_or(false);
    marked && pieces::leader_in_region(state, region, faction).is_none()
}

pub fn frost_blocks_march(state: &State) -> bool {
    state.frost
}
