//! The six-phase Winter Round (spec §4.8). Grounded on the phase order and
//! the row->Senate-position lookup table confirmed by the constant names
//! in `fs_bot/engine/winter.py`; phase bodies follow spec §4.8's prose,
//! since the Python file's bodies were not present in the extraction.

use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::tribes::TribeStatus;
use crate::catalog::{caps, Control, LegionsRow, Marker, Region, SenatePosition};
use crate::control;
use crate::dice::DeterministicRng;
use crate::pieces::{self, LegionSink, LegionSource};
use crate::power::Faction;
use crate::state::State;
use crate::victory::{self, VictoryResult};

/// Runs every Winter phase in order and returns the Victory-phase result
/// (final, in case this was the scenario's last Winter Round).
pub fn run_winter_round(state: &mut State, rng: &mut DeterministicRng) -> VictoryResult {
    let opening = victory::check_victory(state);
    if opening.winner.is_some() {
        return opening;
    }

    if state.scenario.ruleset() == crate::catalog::Ruleset::Base {
        crate::nonplayer::run_germans_phase(state, rng);
    }
    quarters(state, rng);
    harvest(state);
    senate(state, rng);
    spring(state);

    state.winter_count += 1;
    victory::check_victory(state)
}

/// Quarters: per-region Roman upkeep, Legion desertion, German Sugambri
/// relocation, Gallic Warband desertion.
fn quarters(state: &mut State, rng: &mut DeterministicRng) {
    for region in Region::ALL {
        let has_ally = pieces::count(state, region, Faction::Romans, PieceKind::Ally) > 0;
        let devastated = state.regions.get(&region).map(|c| c.has_marker(Marker::Devastated)).unwrap_or(false);
        let has_roman = pieces::count(state, region, Faction::Romans, PieceKind::Legion) > 0
            || pieces::count(state, region, Faction::Romans, PieceKind::Auxilia) > 0;
        if !has_roman {
            continue;
        }
        let base_cost = if has_ally { caps::QUARTERS_COST_WITH_ALLY } else { caps::QUARTERS_COST_WITHOUT_ALLY };
        let cost = if devastated { base_cost * caps::QUARTERS_DEVASTATED_MULTIPLIER } else { base_cost };
        let free_pieces = pieces::count(state, region, Faction::Romans, PieceKind::Ally) * caps::QUARTERS_FREE_PIECES_PER_ALLY
            + pieces::count(state, region, Faction::Romans, PieceKind::Fort) * caps::QUARTERS_FREE_PIECES_PER_FORT;

        let available = *state.resources.get(&Faction::Romans).unwrap_or(&0);
        let funded_pieces = if cost == 0 { u32::MAX } else { (available / cost) + free_pieces };
        let legions = pieces::count(state, region, Faction::Romans, PieceKind::Legion);
        if legions > funded_pieces {
            let unfunded = legions - funded_pieces;
            for _ in 0..unfunded {
                if rng.roll_d6() as u32 <= caps::DESERTION_ROLL_THRESHOLD as u32 {
                    let _ = pieces::remove(state, region, Faction::Romans, PieceKind::Legion, 1, false, Some(LegionSink::Fallen), None);
                }
            }
        }
        let spend = cost.saturating_mul(legions.min(funded_pieces));
        let current = *state.resources.get(&Faction::Romans).unwrap_or(&0);
        state.resources.insert(Faction::Romans, current.saturating_sub(spend));
    }

    let sugambri_germans = pieces::count(state, Region::Sugambri, Faction::Germans, PieceKind::Warband);
    if sugambri_germans > caps::GERMAN_QUARTERS_SUGAMBRI_THRESHOLD {
        let excess = sugambri_germans - caps::GERMAN_QUARTERS_SUGAMBRI_THRESHOLD;
        let _ = pieces::move_pieces(state, Region::Sugambri, Region::Ubii, Faction::Germans, PieceKind::Warband, excess, None);
    }

    for region in Region::ALL {
        for faction in [Faction::Arverni, Faction::Aedui, Faction::Belgae] {
            let controlled = control::is_controlled_by(state, region, faction);
            if controlled {
                continue;
            }
            let hidden = pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden);
            let revealed = pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Revealed);
            for (count, ps) in [(hidden, PieceState::Hidden), (revealed, PieceState::Revealed)] {
                for _ in 0..count {
                    if rng.roll_d6() as u32 <= caps::DESERTION_ROLL_THRESHOLD as u32 {
                        let _ = pieces::remove(state, region, faction, PieceKind::Warband, 1, true, None, Some(ps));
                    }
                }
            }
        }
    }

    control::refresh_all(state);
}

fn harvest(state: &mut State) {
    for faction in Faction::ALL {
        if !state.resources.contains_key(&faction) {
            continue;
        }
        let income: u32 = Region::ALL
            .into_iter()
            .map(|r| {
                pieces::count(state, r, faction, PieceKind::Ally) + pieces::count(state, r, faction, PieceKind::Citadel)
            })
            .sum::<u32>()
            * caps::HARVEST_PER_ALLY_OR_CITADEL
            + if faction == Faction::Aedui { caps::AEDUI_RIVER_TOLLS } else { 0 };
        let current = *state.resources.get(&faction).unwrap_or(&0);
        state.resources.insert(faction, (current + income).min(caps::RESOURCE_CAP));
    }
}

fn senate(state: &mut State, rng: &mut DeterministicRng) {
    let fallen = state.fallen_legions;
    let shift_toward = if fallen <= caps::SENATE_SHIFT_LOW_THRESHOLD {
        Some(SenatePosition::shift_toward_adulation as fn(&SenatePosition) -> SenatePosition)
    } else if fallen >= caps::SENATE_SHIFT_HIGH_THRESHOLD {
        Some(SenatePosition::shift_toward_uproar as fn(&SenatePosition) -> SenatePosition)
    } else {
        None
    };
    if let Some(shift) = shift_toward {
        let next = shift(&state.senate.position);
        if next == state.senate.position {
            state.senate.firm = true;
        } else {
            state.senate.position = next;
            state.senate.firm = false;
        }
    }

    let placeable = LegionsRow::placeable_rows(state.senate.position);
    let mut remaining_budget = state.fallen_legions / 2;
    for row in placeable {
        if remaining_budget == 0 {
            break;
        }
        let on_row = *state.legions_track.get(row).unwrap_or(&0);
        let room = caps::LEGIONS_PER_ROW.saturating_sub(on_row);
        if room == 0 {
            continue;
        }
        let to_place = remaining_budget.min(room).min(state.fallen_legions);
        if to_place == 0 {
            continue;
        }
        let _ = pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Legion, to_place, None, Some(LegionSource::Fallen), None);
        let _ = pieces::remove(state, Region::Provincia, Faction::Romans, PieceKind::Legion, to_place, false, Some(LegionSink::Track), None);
        remaining_budget -= to_place;
    }

    let leader_in_provincia = pieces::leader_in_region(state, Region::Provincia, Faction::Romans).is_some();
    let base_auxilia = match state.senate.position {
        SenatePosition::Uproar => 0,
        SenatePosition::Intrigue => 1,
        SenatePosition::Adulation => 2,
    };
    let auxilia = if leader_in_provincia { base_auxilia + 1 } else { base_auxilia };
    if auxilia > 0 {
        let _ = pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Auxilia, auxilia, None, None, Some(PieceState::Hidden));
    }

    let _ = rng;
    control::refresh_all(state);
}

fn spring(state: &mut State) {
    for region in Region::ALL {
        for faction in Faction::ALL {
            for kind in [PieceKind::Auxilia, PieceKind::Warband] {
                let scouted = pieces::count_by_state(state, region, faction, kind, PieceState::Scouted);
                if scouted > 0 {
                    let _ = pieces::flip(state, region, faction, kind, scouted, PieceState::Scouted, PieceState::Revealed);
                }
                let revealed = pieces::count_by_state(state, region, faction, kind, PieceState::Revealed);
                if revealed > 0 {
                    let _ = pieces::flip(state, region, faction, kind, revealed, PieceState::Revealed, PieceState::Hidden);
                }
            }
        }
        let cell = state.regions.entry(region).or_default();
        cell.clear_marker(Marker::Devastated);
        cell.clear_marker(Marker::Intimidated);
        if state.frost {
            cell.clear_marker(Marker::Frost);
        }
    }
    state.frost = false;

    for (_, record) in state.tribes.iter_mut() {
        record.status = match record.status {
            TribeStatus::Dispersed => TribeStatus::DispersedGathering,
            TribeStatus::DispersedGathering => TribeStatus::Subdued,
            other => other,
        };
    }

    for faction in state.seats.seated() {
        state.eligibility.insert(faction, crate::state::Eligibility::Eligible);
    }
    let _ = Control::None;
    control::refresh_all(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;
    use pretty_assertions::assert_eq;

    /// Scenario D — Senate restores only half the Fallen Legions, computed
    /// once from the pre-phase count, not re-halved per placeable row
    /// (spec §8.4, §4.8 item 5(b)).
    #[test]
    fn senate_restores_half_fallen_legions_once() {
        let mut state = State::new_empty(Scenario::GreatRevolt, 1);
        state.senate.position = SenatePosition::Adulation;
        state.fallen_legions = 4;
        state.legions_track.insert(LegionsRow::Middle, 0);
        state.legions_track.insert(LegionsRow::Top, 0);

        let mut rng = DeterministicRng::new(1, 0);
        senate(&mut state, &mut rng);

        assert_eq!(state.fallen_legions, 2);
        let on_track: u32 = [LegionsRow::Middle, LegionsRow::Top]
            .into_iter()
            .map(|row| *state.legions_track.get(&row).unwrap_or(&0))
            .sum();
        assert_eq!(on_track, 2);
    }
}
