//! Settle (spec §4.4 table), Germans (Ariovistus) only.

use std::collections::HashSet;

use crate::catalog::pieces::PieceKind;
use crate::catalog::{caps, Marker, Region};
use crate::control;
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common;

const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];

pub fn settle(state: &mut State, map: &Map, regions: &[Region]) -> Result<u32, EngineError> {
    let mut settlement_sources: HashSet<Region> = GERMANIA.into_iter().collect();
    for region in crate::catalog::Region::ALL {
        if pieces::count(state, region, Faction::Germans, PieceKind::Settlement) > 0 {
            settlement_sources.insert(region);
        }
    }

    let mut total_cost = 0;
    for &region in regions {
        if GERMANIA.contains(&region) {
            return Err(EngineError::ProximityViolation { reason: "Settle targets a region outside Germania".into() });
        }
        if !control::is_controlled_by(state, region, Faction::Germans) {
            return Err(EngineError::ProximityViolation { reason: "Settle requires Germanic Control".into() });
        }
        let adjacent_to_source = map.neighbors(region).into_iter().any(|n| settlement_sources.contains(&n));
        if !adjacent_to_source {
            return Err(EngineError::ProximityViolation {
                reason: "Settle requires adjacency to Germania or an existing Settlement".into(),
            });
        }
        let devastated = state.regions.get(&region).map(|c| c.has_marker(Marker::Devastated)).unwrap_or(false);
        let cost = if devastated { caps::SETTLE_COST_DEVASTATED } else { caps::SETTLE_COST };
        total_cost += cost;
        common::spend(state, Faction::Germans, cost)?;
        pieces::place(state, region, Faction::Germans, PieceKind::Settlement, 1, None, None, None)?;
        settlement_sources.insert(region);
    }
    control::refresh_all(state);
    Ok(total_cost)
}
