//! Non-player procedures (spec §4.7): Germans Phase (base game) and
//! Arverni Phase (Ariovistus), both deterministic and RNG-seeded.
//! Grounded on the four-sub-step breakdown in `fs_bot/engine/germans.py`
//! and reusing `battle::resolve` / `commands::rally` / `commands::march`
//! / `commands::raid` for the actual mechanics rather than reimplementing
//! them — the non-player is "a faction whose ActionDecisions are chosen
//! by a fixed procedure", not a separate rules path.

use crate::battle::resolve::{resolve_battle, BattleRequest};
use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::Region;
use crate::dice::DeterministicRng;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];

/// Pick the enemy faction present in `region` with the fewest resources;
/// ties broken by RNG. Returns `None` if no enemy is present.
fn weakest_enemy_in(state: &State, rng: &mut DeterministicRng, region: Region, actor: Faction) -> Option<Faction> {
    let mut candidates: Vec<Faction> = Faction::ALL
        .into_iter()
        .filter(|&f| f != actor && has_any_presence(state, region, f))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by_key(|f| *state.resources.get(f).unwrap_or(&0));
    let min_resources = *state.resources.get(&candidates[0]).unwrap_or(&0);
    candidates.retain(|f| *state.resources.get(f).unwrap_or(&0) == min_resources);
    let idx = rng.pick_index(candidates.len());
    Some(candidates[idx])
}

fn has_any_presence(state: &State, region: Region, faction: Faction) -> bool {
    pieces::count(state, region, faction, PieceKind::Legion) > 0
        || pieces::count(state, region, faction, PieceKind::Auxilia) > 0
        || pieces::count(state, region, faction, PieceKind::Warband) > 0
        || pieces::count(state, region, faction, PieceKind::Ally) > 0
        || pieces::leader_in_region(state, region, faction).is_some()
}

/// Runs the four Germans Phase sub-steps: Rally, March, Raid,
/// Battle-with-Ambush. Base ruleset only.
pub fn run_germans_phase(state: &mut State, rng: &mut DeterministicRng) {
    rally_step(state, rng, Faction::Germans);
    march_step(state, rng, Faction::Germans, false);
    raid_step(state, Faction::Germans);
    ambush_step(state, rng, Faction::Germans);
}

/// Runs the Arverni Phase (Ariovistus): Rally, March (skipped under
/// Frost), Raid, Battle-with-Ambush. Only invoked if "At War".
pub fn run_arverni_phase(state: &mut State, rng: &mut DeterministicRng) {
    if !state.at_war {
        return;
    }
    rally_step(state, rng, Faction::Arverni);
    if !state.frost {
        march_step(state, rng, Faction::Arverni, true);
    }
    raid_step(state, Faction::Arverni);
    ambush_step(state, rng, Faction::Arverni);
}

fn rally_step(state: &mut State, rng: &mut DeterministicRng, faction: Faction) {
    let homes: &[Region] = if faction == Faction::Germans { &GERMANIA } else { &[Region::Arverni] };
    for &region in homes {
        let available = pieces::available(state, faction, PieceKind::Warband);
        if available == 0 {
            continue;
        }
        let place_count = available.min(2);
        let _ = pieces::place(state, region, faction, PieceKind::Warband, place_count, None, None, Some(PieceState::Hidden));
    }
    let _ = rng;
}

fn march_step(state: &mut State, rng: &mut DeterministicRng, faction: Faction, uses_map: bool) {
    let map = Map::new(state.scenario);
    let sources: Vec<Region> = Region::ALL.into_iter().filter(|&r| pieces::count(state, r, faction, PieceKind::Warband) > 0).collect();
    for source in sources {
        let targets: Vec<Region> = map.neighbors(source).into_iter().filter(|&n| n != source).collect();
        if targets.is_empty() {
            continue;
        }
        let target = match weakest_enemy_target(state, rng, &targets, faction) {
            Some(t) => t,
            None => continue,
        };
        let movable = pieces::count_by_state(state, source, faction, PieceKind::Warband, PieceState::Hidden);
        if movable == 0 {
            continue;
        }
        let _ = pieces::move_pieces(state, source, target, faction, PieceKind::Warband, movable.min(2), Some(PieceState::Hidden));
    }
    let _ = uses_map;
}

fn weakest_enemy_target(state: &State, rng: &mut DeterministicRng, candidates: &[Region], actor: Faction) -> Option<Region> {
    let mut with_enemies: Vec<Region> = candidates
        .iter()
        .copied()
        .filter(|&r| Faction::ALL.into_iter().any(|f| f != actor && has_any_presence(state, r, f)))
        .collect();
    if with_enemies.is_empty() {
        with_enemies = candidates.to_vec();
    }
    if with_enemies.is_empty() {
        return None;
    }
    let idx = rng.pick_index(with_enemies.len());
    Some(with_enemies[idx])
}

fn raid_step(state: &mut State, faction: Faction) {
    for region in Region::ALL {
        let hidden = pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden);
        if hidden == 0 {
            continue;
        }
        let _ = pieces::flip(state, region, faction, PieceKind::Warband, 1, PieceState::Hidden, PieceState::Revealed);
    }
}

fn ambush_step(state: &mut State, rng: &mut DeterministicRng, faction: Faction) {
    for region in Region::ALL {
        let own_hidden = pieces::count_by_state(state, region, faction, PieceKind::Warband, PieceState::Hidden);
        if own_hidden == 0 {
            continue;
        }
        let enemy = match weakest_enemy_in(state, rng, region, faction) {
            Some(e) => e,
            None => continue,
        };
        let enemy_hidden: u32 = [PieceKind::Auxilia, PieceKind::Warband]
            .into_iter()
            .map(|k| pieces::count_by_state(state, region, enemy, k, PieceState::Hidden))
            .sum();
        if own_hidden <= enemy_hidden {
            continue;
        }
        let req = BattleRequest { is_ambush: true, ..BattleRequest::new(region, faction, enemy) };
        let _ = resolve_battle(state, &req, rng);
    }
}
