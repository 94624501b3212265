//! Derives each region's control tag from its piece bucket. Grounded on
//! `fs_bot/board/control.py::calculate_control` / `refresh_all_control`.

use crate::catalog::{Control, Region};
use crate::power::Faction;
use crate::state::{FactionPieces, State};

/// Sum of one faction's "forces" in a region for control purposes:
/// Leader (1), Legions, Forts (Romans only — enforced by `cap`, so any
/// non-Roman Fort count is always 0), Allies, Citadels, Settlements, and
/// every flippable piece in every state.
fn faction_forces(fp: &FactionPieces) -> u32 {
    fp.leader.is_some() as u32
        + fp.legions
        + fp.forts
        + fp.allies
        + fp.citadels
        + fp.settlements
        + fp.auxilia.total()
        + fp.warbands.total()
}

/// A faction controls a region iff its forces strictly exceed the sum of
/// every other faction's forces there — not merely each individually.
/// Confirmed by the self-correcting comment in `control.py` that the
/// comparison is against the combined total of all other factions.
pub fn calculate_control(state: &State, region: Region) -> Control {
    let cell = match state.regions.get(&region) {
        Some(cell) => cell,
        None => return Control::None,
    };

    let mut totals: Vec<(Faction, u32)> =
        Faction::ALL.into_iter().map(|f| (f, faction_forces(cell.faction(f)))).collect();
    let total_all: u32 = totals.iter().map(|(_, n)| *n).sum();

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    if let Some((faction, count)) = totals.first() {
        if *count > total_all - count {
            return faction_to_control(*faction);
        }
    }
    Control::None
}

fn faction_to_control(faction: Faction) -> Control {
    match faction {
        Faction::Romans => Control::Roman,
        Faction::Arverni => Control::Arverni,
        Faction::Aedui => Control::Aedui,
        Faction::Belgae => Control::Belgic,
        Faction::Germans => Control::Germanic,
    }
}

/// Recompute `control` for every region. Called by every command, battle,
/// winter step, and card effect that changes pieces (spec §4.2 Triggers).
pub fn refresh_all(state: &mut State) {
    let updates: Vec<(Region, Control)> =
        Region::ALL.into_iter().map(|region| (region, calculate_control(state, region))).collect();
    for (region, control) in updates {
        state.regions.entry(region).or_default().control = control;
    }
}

pub fn is_controlled_by(state: &State, region: Region, faction: Faction) -> bool {
    state.regions.get(&region).map(|c| c.control == faction_to_control(faction)).unwrap_or(false)
}

pub fn controlled_regions(state: &State, faction: Faction) -> Vec<Region> {
    Region::ALL.into_iter().filter(|r| is_controlled_by(state, *r, faction)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::pieces::PieceKind;
    use crate::catalog::Scenario;
    use crate::pieces;

    #[test]
    fn strict_majority_over_combined_others() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 3, None, None, None)
            .unwrap();
        pieces::place(&mut state, Region::Arverni, Faction::Aedui, PieceKind::Warband, 2, None, None, None).unwrap();
        pieces::place(&mut state, Region::Arverni, Faction::Belgae, PieceKind::Warband, 1, None, None, None).unwrap();
        // Arverni 3 vs (Aedui 2 + Belgae 1) = 3: not strictly greater, so None.
        assert_eq!(calculate_control(&state, Region::Arverni), Control::None);

        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 1, None, None, None)
            .unwrap();
        assert_eq!(calculate_control(&state, Region::Arverni), Control::Arverni);
    }

    #[test]
    fn refresh_all_is_idempotent() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        pieces::place(&mut state, Region::Aedui, Faction::Aedui, PieceKind::Warband, 1, None, None, None).unwrap();
        refresh_all(&mut state);
        let first = state.regions.clone();
        refresh_all(&mut state);
        assert_eq!(state.regions, first);
    }
}
