//! Victory scoring, margin, and tie-break (spec §4.9). Grounded on the
//! per-faction formulas confirmed (as labels, not bodies) in
//! `fs_bot/engine/victory.py`, and on the fixed faction ordering used by
//! `fs_bot/state/setup.py::BASE_SCENARIOS` / `ARIOVISTUS_SCENARIOS`.

use crate::catalog::pieces::PieceKind;
use crate::catalog::tribes::TribeStatus;
use crate::catalog::{caps, Region, Ruleset};
use crate::control;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VictoryResult {
    pub winner: Option<Faction>,
    pub margins: Vec<(Faction, i64)>,
}

fn seated(state: &State) -> Vec<Faction> {
    state.seats.seated().to_vec()
}

fn roman_score(state: &State) -> i64 {
    let mut score: i64 = 0;
    for record in state.tribes.values() {
        match record.status {
            TribeStatus::Subdued | TribeStatus::Dispersed => score += 1,
            _ => {}
        }
    }
    score += Region::ALL.iter().map(|&r| pieces::count(state, r, Faction::Romans, PieceKind::Ally) as i64).sum::<i64>();
    if state.scenario.ruleset() == Ruleset::Ariovistus {
        score -= Region::ALL.iter().map(|&r| pieces::count(state, r, Faction::Germans, PieceKind::Settlement) as i64).sum::<i64>();
    }
    score
}

fn arverni_offmap_legions(state: &State) -> u32 {
    state.fallen_legions + state.removed_legions + state.legions_track.values().sum::<u32>()
}

fn arverni_allies_citadels(state: &State) -> u32 {
    Region::ALL
        .iter()
        .map(|&r| pieces::count(state, r, Faction::Arverni, PieceKind::Ally) + pieces::count(state, r, Faction::Arverni, PieceKind::Citadel))
        .sum()
}

fn aedui_score(state: &State) -> i64 {
    Region::ALL
        .iter()
        .map(|&r| {
            (pieces::count(state, r, Faction::Aedui, PieceKind::Ally) + pieces::count(state, r, Faction::Aedui, PieceKind::Citadel)) as i64
        })
        .sum()
}

fn belgic_score(state: &State) -> i64 {
    let mut score: i64 = 0;
    for region in Region::ALL {
        if control::is_controlled_by(state, region, Faction::Belgae) {
            score += region.control_value() as i64;
        }
        score += pieces::count(state, region, Faction::Belgae, PieceKind::Ally) as i64;
        score += pieces::count(state, region, Faction::Belgae, PieceKind::Citadel) as i64;
        if state.regions.get(&region).map(|c| c.has_marker(crate::catalog::Marker::Colony)).unwrap_or(false) {
            score += 1;
        }
    }
    for record in state.tribes.values() {
        if record.status == TribeStatus::Dispersed && record.allied_faction == Some(Faction::Belgae) {
            score -= 1;
        }
    }
    score
}

fn germanic_score(state: &State) -> i64 {
    let mut score: i64 = 0;
    for region in Region::ALL {
        score += pieces::count(state, region, Faction::Germans, PieceKind::Settlement) as i64;
        score += pieces::count(state, region, Faction::Germans, PieceKind::Ally) as i64;
        if control::is_controlled_by(state, region, Faction::Germans) {
            score += region.control_value() as i64;
        }
    }
    score
}

/// Computes every seated faction's margin (score minus threshold; for the
/// Arverni dual condition, the minimum of the two component margins) and
/// picks the winner, if any, using the fixed scenario faction ordering as
/// the tie-break.
pub fn check_victory(state: &State) -> VictoryResult {
    let mut margins = Vec::new();
    for faction in seated(state) {
        let margin = match faction {
            Faction::Romans => roman_score(state) - caps::ROMAN_VICTORY_THRESHOLD as i64,
            Faction::Arverni => {
                let a_margin = arverni_offmap_legions(state) as i64 - caps::ARVERNI_OFFMAP_LEGIONS_THRESHOLD as i64;
                let b_margin = arverni_allies_citadels(state) as i64 - caps::ARVERNI_ALLIES_CITADELS_THRESHOLD as i64;
                a_margin.min(b_margin)
            }
            Faction::Aedui => {
                let mine = aedui_score(state);
                let best_other = seated(state)
                    .into_iter()
                    .filter(|&f| f != Faction::Aedui)
                    .map(|f| score_for(state, f))
                    .max()
                    .unwrap_or(i64::MIN);
                mine - best_other - 1
            }
            Faction::Belgae => belgic_score(state) - caps::BELGIC_VICTORY_THRESHOLD as i64,
            Faction::Germans => germanic_score(state) - caps::GERMANIC_VICTORY_THRESHOLD as i64,
        };
        margins.push((faction, margin));
    }

    let winner = margins
        .iter()
        .filter(|(_, m)| *m >= 0)
        .max_by_key(|(f, m)| (*m, priority_rank(state, *f)))
        .map(|(f, _)| *f);

    VictoryResult { winner, margins }
}

fn score_for(state: &State, faction: Faction) -> i64 {
    match faction {
        Faction::Romans => roman_score(state),
        Faction::Arverni => arverni_offmap_legions(state).min(arverni_allies_citadels(state)) as i64,
        Faction::Aedui => aedui_score(state),
        Faction::Belgae => belgic_score(state),
        Faction::Germans => germanic_score(state),
    }
}

/// Fixed scenario-specific faction ordering used to break ties among
/// simultaneous threshold-meeting factions: order of play (Romans first,
/// then Arverni/Germans, Aedui, Belgae) mirrors the seated-factions order.
fn priority_rank(state: &State, faction: Faction) -> std::cmp::Reverse<usize> {
    let order = seated(state);
    std::cmp::Reverse(order.iter().position(|f| *f == faction).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;

    #[test]
    fn arverni_dual_victory_needs_both_components() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        state.fallen_legions = 6;
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Ally, 8, None, None, None).unwrap();
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Citadel, 2, None, None, None).unwrap();
        let result = check_victory(&state);
        let margin = result.margins.iter().find(|(f, _)| *f == Faction::Arverni).unwrap().1;
        assert_eq!(margin, 0);
        assert_eq!(result.winner, Some(Faction::Arverni));

        pieces::remove(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Ally, 1, false, None, None).unwrap();
        let result = check_victory(&state);
        let margin = result.margins.iter().find(|(f, _)| *f == Faction::Arverni).unwrap().1;
        assert!(margin < 0);
    }
}
