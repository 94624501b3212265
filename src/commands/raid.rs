//! Raid (spec §4.3.3): flip Hidden Warbands to Revealed for resources, or
//! to steal from an enemy present in the same region.

use crate::action::CmdParams;
use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::{Marker, Region};
use crate::control;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use super::common;

fn enemy_blocks_steal(state: &State, region: Region, enemy: Faction) -> bool {
    pieces::count(state, region, enemy, PieceKind::Fort) > 0 || pieces::count(state, region, enemy, PieceKind::Citadel) > 0
}

/// Raid in a single region. `params.target_faction`, if given, is the
/// faction to steal from for each flipped Warband; otherwise each flip
/// gains 1 Resource (when the region is not Devastated). Returns the net
/// resources gained by the acting faction.
pub fn raid(state: &mut State, faction: Faction, params: &CmdParams) -> Result<i64, EngineError> {
    if faction == Faction::Germans && state.scenario.ruleset() == crate::catalog::Ruleset::Base {
        return Err(EngineError::EligibilityViolation {
            reason: "base-game Germans can only Raid via the Germans Phase".into(),
        });
    }
    let region = *params.regions.first().ok_or_else(|| EngineError::InvalidAction { reason: "raid requires a region".into() })?;
    let count = params.counts.get(&region).copied().unwrap_or_else(|| pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden));
    let hidden = pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden);
    if count == 0 || count > hidden {
        return Err(EngineError::InvalidAction { reason: "not enough Hidden Warbands to Raid with".into() });
    }
    pieces::flip(state, region, faction, PieceKind::Warband, count, PieceState::Hidden, PieceState::Revealed)?;

    let devastated = state.regions.get(&region).map(|c| c.has_marker(Marker::Devastated)).unwrap_or(false);
    let mut net_gain: i64 = 0;
    match params.target_faction {
        Some(enemy) if enemy != faction => {
            if enemy_blocks_steal(state, region, enemy) {
                return Err(EngineError::InvalidAction {
                    reason: format!("{:?}'s Fort/Citadel in {:?} blocks stealing", enemy, region),
                });
            }
            let enemy_resources = *state.resources.get(&enemy).unwrap_or(&0);
            let stolen = count.min(enemy_resources);
            state.resources.insert(enemy, enemy_resources - stolen);
            common::gain(state, faction, stolen);
            net_gain = stolen as i64;
        }
        _ => {
            if !devastated {
                common::gain(state, faction, count);
                net_gain = count as i64;
            }
        }
    }
    control::refresh_all(state);
    Ok(net_gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;
    use std::collections::BTreeMap;

    #[test]
    fn raid_gains_one_resource_per_flip() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 2, None, None, None).unwrap();
        let mut counts = BTreeMap::new();
        counts.insert(Region::Arverni, 2);
        let params = CmdParams { regions: vec![Region::Arverni], counts, ..Default::default() };
        let gain = raid(&mut state, Faction::Arverni, &params).unwrap();
        assert_eq!(gain, 2);
        assert_eq!(*state.resources.get(&Faction::Arverni).unwrap(), 2);
    }
}
