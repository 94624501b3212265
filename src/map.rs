//! Region/tribe/adjacency queries over the static catalog, gated by
//! scenario and by runtime markers (e.g. Britannia-Not-In-Play). Grounded
//! on the teacher's `data/mod.rs::GameMap` lookup-wrapper pattern.

use std::collections::VecDeque;

use crate::catalog::tribes::Tribe;
use crate::catalog::{self, AdjacencyKind, Control, Marker, Region, Scenario};
use crate::power::Faction;
use crate::state::State;

/// Thin, stateless wrapper over the catalog's static region/tribe tables.
/// Scenario-dependent playability and supply queries take a `State`
/// reference because they depend on runtime markers and control.
pub struct Map {
    pub scenario: Scenario,
}

impl Map {
    pub fn new(scenario: Scenario) -> Self {
        Map { scenario }
    }

    pub fn is_adjacent(&self, a: Region, b: Region) -> bool {
        catalog::is_adjacent(a, b)
    }

    pub fn adjacency_kind(&self, a: Region, b: Region) -> Option<AdjacencyKind> {
        catalog::adjacency_kind(a, b)
    }

    pub fn neighbors(&self, region: Region) -> Vec<Region> {
        catalog::adjacent_regions(region)
    }

    pub fn tribes_in(&self, region: Region) -> Vec<Tribe> {
        Tribe::ALL.into_iter().filter(|t| t.home_region() == region).collect()
    }

    /// Whether `region` is part of the currently-playable board. Britannia
    /// is excluded whenever the Britannia-Not-In-Play marker is set there
    /// (scenario setup may start a shorter scenario without it).
    pub fn is_playable(&self, state: &State, region: Region) -> bool {
        if region == Region::Britannia {
            return !state.regions.get(&region).map(|c| c.has_marker(Marker::BritanniaNotInPlay)).unwrap_or(false);
        }
        true
    }

    /// "Adjacent to German Control" (A18/A37): `region` is adjacent (any
    /// edge kind) to some region whose derived Control tag is Germanic.
    /// Open Question decision recorded in `SPEC_FULL.md`.
    pub fn adjacent_to_germanic_control(&self, state: &State, region: Region) -> bool {
        self.neighbors(region).into_iter().any(|n| state.regions.get(&n).map(|c| c.control == Control::Germanic).unwrap_or(false))
    }

    /// Breadth-first search for a supply line from `region` to Cisalpina
    /// through regions not hostile to `faction` (i.e. not Controlled by an
    /// enemy of `faction`). Used by Roman Recruit, Build, and Aedui Trade.
    pub fn has_supply_line_to_cisalpina(&self, state: &State, region: Region, faction: Faction) -> bool {
        if region == Region::Cisalpina {
            return true;
        }
        if self.is_hostile_to(state, region, faction) {
            return false;
        }
        let mut visited = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(region);
        visited.insert(region);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if visited.contains(&next) {
                    continue;
                }
                if self.is_hostile_to(state, next, faction) {
                    continue;
                }
                if next == Region::Cisalpina {
                    return true;
                }
                visited.insert(next);
                queue.push_back(next);
            }
        }
        false
    }

    /// A region is hostile to `faction` if it is Controlled by a different
    /// faction.
    fn is_hostile_to(&self, state: &State, region: Region, faction: Faction) -> bool {
        let control = state.regions.get(&region).map(|c| c.control).unwrap_or(Control::None);
        control != Control::None && control != faction_control(faction)
    }
}

fn faction_control(faction: Faction) -> Control {
    match faction {
        Faction::Romans => Control::Roman,
        Faction::Arverni => Control::Arverni,
        Faction::Aedui => Control::Aedui,
        Faction::Belgae => Control::Belgic,
        Faction::Germans => Control::Germanic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pieces::PieceKind;
    use crate::control;
    use crate::pieces;

    #[test]
    fn provincia_has_supply_line_to_cisalpina() {
        let state = State::new_empty(Scenario::GreatRevolt, 1);
        let map = Map::new(Scenario::GreatRevolt);
        assert!(map.has_supply_line_to_cisalpina(&state, Region::Provincia, Faction::Romans));
    }

    #[test]
    fn hostile_control_blocks_supply_line() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        let map = Map::new(Scenario::GreatRevolt);
        pieces::place(&mut state, Region::Sequani, Faction::Arverni, PieceKind::Warband, 5, None, None, None)
            .unwrap();
        control::refresh_all(&mut state);
        assert_eq!(state.regions[&Region::Sequani].control, Control::Arverni);
        // Arverni holds the only land route from Aedui toward Cisalpina in
        // this reduced map, so Roman supply should fail through it.
        assert!(!map.has_supply_line_to_cisalpina(&state, Region::Sequani, Faction::Romans));
    }
}
