//! Enlist (spec §4.4 table), Belgae only: borrow Germanic Warbands for
//! the attached command, or trigger one free Germanic Limited Command.

use crate::catalog::pieces::PieceKind;
use crate::catalog::{Region, Ruleset};
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

fn germania_adjacent_or_present(state: &State, map: &Map, region: Region) -> bool {
    const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];
    GERMANIA.contains(&region)
        || map.neighbors(region).into_iter().any(|n| GERMANIA.contains(&n))
        || pieces::count(state, region, Faction::Germans, PieceKind::Warband) > 0
}

pub fn validate(state: &State, map: &Map, region: Region) -> Result<(), EngineError> {
    if !germania_adjacent_or_present(state, map, region) {
        return Err(EngineError::ProximityViolation {
            reason: format!("{:?} is not in/adjacent to Germania and holds no Germanic pieces", region),
        });
    }
    Ok(())
}

/// Ariovistus total-German-pieces cap and the rule that Enlist may never
/// target Ariovistus's own region.
pub fn validate_ariovistus(state: &State, region: Region) -> Result<(), EngineError> {
    if state.scenario.ruleset() != Ruleset::Ariovistus {
        return Ok(());
    }
    if pieces::leader_in_region(state, region, Faction::Germans) == Some(crate::catalog::pieces::Leader::Ariovistus) {
        return Err(EngineError::ProximityViolation { reason: "Enlist may not target Ariovistus's own region".into() });
    }
    let total: u32 = crate::catalog::Region::ALL
        .into_iter()
        .map(|r| {
            pieces::count(state, r, Faction::Germans, PieceKind::Warband) + pieces::count(state, r, Faction::Germans, PieceKind::Auxilia)
        })
        .sum();
    if total > crate::catalog::caps::ARIOVISTUS_SETTLE_PIECE_CAP {
        return Err(EngineError::CapExceeded { reason: "Ariovistus German-piece cap for Enlist exceeded".into() });
    }
    Ok(())
}
