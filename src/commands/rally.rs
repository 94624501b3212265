//! Rally / Recruit (spec §4.3.1). One entrypoint dispatches Roman Recruit,
//! Gallic Rally, and Germanic Rally by faction; each computes its own cost
//! schedule and places pieces straight from Available (Auxilia/Warbands)
//! or the Legions track (Romans only).

use crate::action::CmdParams;
use crate::catalog::pieces::PieceKind;
use crate::catalog::{caps, Marker, Region};
use crate::control;
use crate::error::EngineError;
use crate::map::Map;
use crate::pieces::{self, LegionSource};
use crate::power::Faction;
use crate::state::State;

use super::common;

const AEDUI_HOME: [Region; 1] = [Region::Aedui];
const BELGAE_HOME: [Region; 3] = [Region::Morini, Region::Nervii, Region::Atrebates];
const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];

fn has_own_piece_present(state: &State, region: Region, faction: Faction) -> bool {
    state.regions.get(&region).map(|c| !c.faction(faction).is_empty()).unwrap_or(false)
}

/// Total resource cost and piece count for one region, given the faction's
/// schedule. Returns `(cost, placeable_kind)`.
fn region_cost(state: &State, map: &Map, faction: Faction, region: Region) -> Result<u32, EngineError> {
    match faction {
        Faction::Romans => {
            let in_cisalpina = region == Region::Cisalpina;
            if !in_cisalpina
                && !has_own_piece_present(state, region, Faction::Romans)
                && !map.has_supply_line_to_cisalpina(state, region, Faction::Romans)
            {
                return Err(EngineError::ProximityViolation {
                    reason: format!("no Roman piece in {:?} and no supply line to Cisalpina", region),
                });
            }
            Ok(caps::roman_recruit_cost(in_cisalpina))
        }
        Faction::Aedui => Ok(caps::gallic_rally_cost(faction, AEDUI_HOME.contains(&region))),
        Faction::Belgae => Ok(caps::gallic_rally_cost(faction, BELGAE_HOME.contains(&region))),
        Faction::Arverni => {
            let devastated = state.regions.get(&region).map(|c| c.has_marker(Marker::Devastated)).unwrap_or(false);
            let vercingetorix_here = pieces::leader_in_region(state, region, Faction::Arverni)
                == Some(crate::catalog::pieces::Leader::Vercingetorix);
            Ok(caps::gallic_rally_cost(faction, devastated && vercingetorix_here))
        }
        Faction::Germans => {
            let has_settlement = pieces::count(state, region, Faction::Germans, PieceKind::Settlement) > 0;
            Ok(caps::germanic_rally_cost(GERMANIA.contains(&region), has_settlement))
        }
    }
}

/// Rally/Recruit in every region named by `params.regions`, placing
/// `params.counts[region]` pieces of `params.piece_kinds[0]` (Romans may
/// mix Legion and Auxilia by supplying both kinds and splitting counts
/// across two passes at the caller's discretion). Returns total resources
/// spent.
pub fn rally(state: &mut State, map: &Map, faction: Faction, params: &CmdParams) -> Result<u32, EngineError> {
    let kind = *params.piece_kinds.first().ok_or_else(|| EngineError::InvalidAction {
        reason: "rally requires at least one piece kind".into(),
    })?;
    let mut total_cost = 0;
    for &region in &params.regions {
        if common::intimidated_blocks(state, region, faction) {
            return Err(EngineError::EligibilityViolation {
                reason: format!("{:?} is Intimidated against {:?}", region, faction),
            });
        }
        total_cost += region_cost(state, map, faction, region)?;
    }
    common::spend(state, faction, total_cost)?;

    for &region in &params.regions {
        let count = *params.counts.get(&region).unwrap_or(&0);
        if count == 0 {
            continue;
        }
        match kind {
            PieceKind::Legion => pieces::place(state, region, faction, kind, count, None, Some(LegionSource::Track), None)?,
            _ => pieces::place(state, region, faction, kind, count, None, None, None)?,
        }
    }
    control::refresh_all(state);
    Ok(total_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;
    use std::collections::BTreeMap;

    #[test]
    fn roman_recruit_in_cisalpina_is_free() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        let map = Map::new(Scenario::GreatRevolt);
        let mut counts = BTreeMap::new();
        counts.insert(Region::Cisalpina, 2);
        let params = CmdParams {
            regions: vec![Region::Cisalpina],
            counts,
            piece_kinds: vec![PieceKind::Auxilia],
            ..Default::default()
        };
        let spent = rally(&mut state, &map, Faction::Romans, &params).unwrap();
        assert_eq!(spent, 0);
        assert_eq!(pieces::count(&state, Region::Cisalpina, Faction::Romans, PieceKind::Auxilia), 2);
    }

    #[test]
    fn aedui_rally_outside_home_costs_two() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        let map = Map::new(Scenario::GreatRevolt);
        state.resources.insert(Faction::Aedui, 10);
        let mut counts = BTreeMap::new();
        counts.insert(Region::Arverni, 1);
        let params = CmdParams {
            regions: vec![Region::Arverni],
            counts,
            piece_kinds: vec![PieceKind::Warband],
            ..Default::default()
        };
        let spent = rally(&mut state, &map, Faction::Aedui, &params).unwrap();
        assert_eq!(spent, 2);
    }
}
