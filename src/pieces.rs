//! The sole mutator of piece counts. Every other component — Commands,
//! Special Activities, Battle, Winter — routes piece changes through this
//! module; nothing else may write to a region's `FactionPieces` bucket.
//! Grounded line-for-line on
//! `fs_bot/board/pieces.py::place_piece/remove_piece/move_piece/flip_piece`.

use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::{caps, Region};
use crate::error::EngineError;
use crate::power::Faction;
use crate::state::State;

/// Where Legions are drawn from when placed (never Available; spec §4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegionSource {
    Track,
    Fallen,
}

/// Where removed Legions go (defaults to Fallen; spec §4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegionSink {
    Fallen,
    Track,
    Removed,
}

fn stacking_err(reason: impl Into<String>) -> EngineError {
    EngineError::StackingViolation { reason: reason.into() }
}

fn not_present(reason: impl Into<String>) -> EngineError {
    EngineError::NotPresent { reason: reason.into() }
}

/// Place `count` pieces of `kind` into `region` for `faction`.
///
/// Leaders require `leader_name`; at most one per region. Legions require
/// `legion_source`; they never come from Available. Flippables default to
/// Hidden unless `piece_state` is given.
pub fn place(
    state: &mut State,
    region: Region,
    faction: Faction,
    kind: PieceKind,
    count: u32,
    leader_name: Option<Leader>,
    legion_source: Option<LegionSource>,
    piece_state: Option<PieceState>,
) -> Result<(), EngineError> {
    if count == 0 {
        return Ok(());
    }
    let cap = caps::cap(state.scenario, faction, kind);
    if cap == 0 && kind != PieceKind::Leader {
        return Err(EngineError::UnknownPieceKind(format!("{:?} has no {:?} in this scenario", faction, kind)));
    }

    match kind {
        PieceKind::Leader => {
            if count != 1 {
                return Err(stacking_err("can only place 1 Leader at a time"));
            }
            let cell = state.regions.entry(region).or_default();
            if cell.faction(faction).leader.is_some() {
                return Err(stacking_err(format!("{:?} already has a Leader in {:?}", faction, region)));
            }
            let leader = leader_name.ok_or_else(|| {
                EngineError::InvalidAction { reason: "leader_name required when placing a Leader".into() }
            })?;
            let available = state.available.get(&faction).and_then(|m| m.get(&PieceKind::Leader)).copied().unwrap_or(0);
            if available < 1 {
                return Err(EngineError::NoAvailable { kind: "Leader".into(), needed: 1, available });
            }
            state.available.entry(faction).or_default().insert(PieceKind::Leader, available - 1);
            cell.faction_mut(faction).leader = Some(leader);
            Ok(())
        }
        PieceKind::Legion => {
            if faction != Faction::Romans {
                return Err(EngineError::UnknownPieceKind("only Romans have Legions".into()));
            }
            match legion_source.ok_or_else(|| EngineError::InvalidAction {
                reason: "Legions require from_track or from_fallen; they are never in Available".into(),
            })? {
                LegionSource::Fallen => {
                    if state.fallen_legions < count {
                        return Err(EngineError::NoAvailable {
                            kind: "Fallen Legion".into(),
                            needed: count,
                            available: state.fallen_legions,
                        });
                    }
                    state.fallen_legions -= count;
                }
                LegionSource::Track => {
                    let mut remaining = count;
                    for row in crate::catalog::LegionsRow::ALL.iter().rev() {
                        let on_row = *state.legions_track.get(row).unwrap_or(&0);
                        let take = on_row.min(remaining);
                        state.legions_track.insert(*row, on_row - take);
                        remaining -= take;
                        if remaining == 0 {
                            break;
                        }
                    }
                    if remaining > 0 {
                        return Err(EngineError::NoAvailable {
                            kind: "Track Legion".into(),
                            needed: count,
                            available: count - remaining,
                        });
                    }
                }
            }
            state.regions.entry(region).or_default().faction_mut(faction).legions += count;
            Ok(())
        }
        PieceKind::Fort => {
            if faction != Faction::Romans {
                return Err(EngineError::UnknownPieceKind("only Romans have Forts".into()));
            }
            let cell = state.regions.entry(region).or_default();
            let current = cell.faction(faction).forts;
            if current + count > caps::MAX_FORTS_PER_REGION {
                return Err(stacking_err(format!("max {} Fort per region", caps::MAX_FORTS_PER_REGION)));
            }
            let available = state.available(faction, kind);
            if available < count {
                return Err(EngineError::NoAvailable { kind: "Fort".into(), needed: count, available });
            }
            state.set_available(faction, kind, available - count);
            state.regions.entry(region).or_default().faction_mut(faction).forts += count;
            Ok(())
        }
        PieceKind::Settlement => {
            if faction != Faction::Germans {
                return Err(EngineError::UnknownPieceKind("only Germans have Settlements".into()));
            }
            let total_in_region: u32 =
                state.regions.entry(region).or_default().pieces.values().map(|fp| fp.settlements).sum();
            if total_in_region + count > caps::MAX_SETTLEMENTS_PER_REGION {
                return Err(stacking_err(format!("max {} Settlement per region", caps::MAX_SETTLEMENTS_PER_REGION)));
            }
            let available = state.available(faction, kind);
            if available < count {
                return Err(EngineError::NoAvailable { kind: "Settlement".into(), needed: count, available });
            }
            state.set_available(faction, kind, available - count);
            state.regions.entry(region).or_default().faction_mut(faction).settlements += count;
            Ok(())
        }
        PieceKind::Ally | PieceKind::Citadel => {
            let available = state.available(faction, kind);
            if available < count {
                return Err(EngineError::NoAvailable { kind: format!("{:?}", kind), needed: count, available });
            }
            state.set_available(faction, kind, available - count);
            let cell = state.regions.entry(region).or_default().faction_mut(faction);
            match kind {
                PieceKind::Ally => cell.allies += count,
                PieceKind::Citadel => cell.citadels += count,
                _ => unreachable!(),
            }
            Ok(())
        }
        PieceKind::Auxilia | PieceKind::Warband => {
            let ps = piece_state.unwrap_or(PieceState::Hidden);
            let available = state.available(faction, kind);
            if available < count {
                return Err(EngineError::NoAvailable { kind: format!("{:?}", kind), needed: count, available });
            }
            state.set_available(faction, kind, available - count);
            let cell = state.regions.entry(region).or_default().faction_mut(faction);
            let counts = cell.flippable_mut(kind).expect("flippable kind");
            *counts.get_mut(ps) += count;
            Ok(())
        }
    }
}

/// Remove `count` pieces of `kind` from `region`. Legions default to
/// `LegionSink::Fallen` when `legion_sink` is `None`. Flippables remove
/// from `piece_state` if given, else drain Hidden, then Revealed, then
/// Scouted.
pub fn remove(
    state: &mut State,
    region: Region,
    faction: Faction,
    kind: PieceKind,
    count: u32,
    to_available: bool,
    legion_sink: Option<LegionSink>,
    piece_state: Option<PieceState>,
) -> Result<(), EngineError> {
    if count == 0 {
        return Ok(());
    }
    match kind {
        PieceKind::Leader => {
            if count != 1 {
                return Err(stacking_err("can only remove 1 Leader at a time"));
            }
            let cell = state.regions.entry(region).or_default();
            let leader = cell
                .faction(faction)
                .leader
                .ok_or_else(|| not_present(format!("no {:?} Leader in {:?}", faction, region)))?;
            cell.faction_mut(faction).leader = None;
            if leader.removed_leaves_play() {
                return Ok(());
            }
            if to_available {
                let available = state.available(faction, PieceKind::Leader);
                state.set_available(faction, PieceKind::Leader, available + 1);
            }
            Ok(())
        }
        PieceKind::Legion => {
            let cell = state.regions.entry(region).or_default();
            let current = cell.faction(faction).legions;
            if current < count {
                return Err(not_present(format!("only {} Legions in {:?}, need {}", current, region, count)));
            }
            cell.faction_mut(faction).legions = current - count;
            match legion_sink.unwrap_or(LegionSink::Fallen) {
                LegionSink::Fallen => state.fallen_legions += count,
                LegionSink::Removed => state.removed_legions += count,
                LegionSink::Track => {
                    let mut remaining = count;
                    for row in crate::catalog::LegionsRow::ALL {
                        let on_row = *state.legions_track.get(&row).unwrap_or(&0);
                        let room = caps::LEGIONS_PER_ROW.saturating_sub(on_row);
                        let add = room.min(remaining);
                        state.legions_track.insert(row, on_row + add);
                        remaining -= add;
                        if remaining == 0 {
                            break;
                        }
                    }
                }
            }
            Ok(())
        }
        PieceKind::Fort => {
            let cell = state.regions.entry(region).or_default();
            let current = cell.faction(faction).forts;
            if region == Region::Provincia && current <= count {
                return Err(EngineError::PermanentFortProtection);
            }
            if current < count {
                return Err(not_present(format!("only {} Forts in {:?}, need {}", current, region, count)));
            }
            cell.faction_mut(faction).forts = current - count;
            if to_available {
                let available = state.available(faction, kind);
                state.set_available(faction, kind, available + count);
            }
            Ok(())
        }
        PieceKind::Ally | PieceKind::Citadel | PieceKind::Settlement => {
            let cell = state.regions.entry(region).or_default();
            let fp = cell.faction_mut(faction);
            let current = match kind {
                PieceKind::Ally => fp.allies,
                PieceKind::Citadel => fp.citadels,
                PieceKind::Settlement => fp.settlements,
                _ => unreachable!(),
            };
            if current < count {
                return Err(not_present(format!("only {} {:?} in {:?}, need {}", current, kind, region, count)));
            }
            match kind {
                PieceKind::Ally => fp.allies -= count,
                PieceKind::Citadel => fp.citadels -= count,
                PieceKind::Settlement => fp.settlements -= count,
                _ => unreachable!(),
            }
            if to_available {
                let available = state.available(faction, kind);
                state.set_available(faction, kind, available + count);
            }
            Ok(())
        }
        PieceKind::Auxilia | PieceKind::Warband => {
            let cell = state.regions.entry(region).or_default();
            let counts = cell.faction_mut(faction).flippable_mut(kind).expect("flippable kind");
            let mut removed = 0u32;
            let order = match piece_state {
                Some(ps) => vec![ps],
                None => vec![PieceState::Hidden, PieceState::Revealed, PieceState::Scouted],
            };
            for ps in order {
                if removed >= count {
                    break;
                }
                let current = counts.get(ps);
                let take = current.min(count - removed);
                *counts.get_mut(ps) -= take;
                removed += take;
            }
            if removed < count {
                return Err(not_present(format!(
                    "only {} {:?} {:?} in {:?}, need {}",
                    removed, faction, kind, region, count
                )));
            }
            if to_available {
                let available = state.available(faction, kind);
                state.set_available(faction, kind, available + count);
            }
            Ok(())
        }
    }
}

/// Atomically move pieces between regions without touching Available.
pub fn move_pieces(
    state: &mut State,
    from_region: Region,
    to_region: Region,
    faction: Faction,
    kind: PieceKind,
    count: u32,
    piece_state: Option<PieceState>,
) -> Result<(), EngineError> {
    if count == 0 {
        return Ok(());
    }
    match kind {
        PieceKind::Leader => {
            let src = state.regions.entry(from_region).or_default();
            let leader = src
                .faction(faction)
                .leader
                .ok_or_else(|| not_present(format!("no {:?} Leader in {:?}", faction, from_region)))?;
            src.faction_mut(faction).leader = None;
            let dst = state.regions.entry(to_region).or_default();
            if dst.faction(faction).leader.is_some() {
                return Err(stacking_err(format!("{:?} already has a Leader in {:?}", faction, to_region)));
            }
            dst.faction_mut(faction).leader = Some(leader);
            Ok(())
        }
        PieceKind::Legion => {
            let src = state.regions.entry(from_region).or_default();
            let current = src.faction(faction).legions;
            if current < count {
                return Err(not_present(format!("only {} Legions in {:?}, need {}", current, from_region, count)));
            }
            src.faction_mut(faction).legions = current - count;
            state.regions.entry(to_region).or_default().faction_mut(faction).legions += count;
            Ok(())
        }
        PieceKind::Fort | PieceKind::Ally | PieceKind::Citadel | PieceKind::Settlement => {
            let src = state.regions.entry(from_region).or_default();
            let fp = src.faction_mut(faction);
            let current = match kind {
                PieceKind::Fort => fp.forts,
                PieceKind::Ally => fp.allies,
                PieceKind::Citadel => fp.citadels,
                PieceKind::Settlement => fp.settlements,
                _ => unreachable!(),
            };
            if kind == PieceKind::Fort && from_region == Region::Provincia && current.saturating_sub(count) < 1 {
                return Err(EngineError::PermanentFortProtection);
            }
            if current < count {
                return Err(not_present(format!("only {} {:?} in {:?}, need {}", current, kind, from_region, count)));
            }
            match kind {
                PieceKind::Fort => fp.forts -= count,
                PieceKind::Ally => fp.allies -= count,
                PieceKind::Citadel => fp.citadels -= count,
                PieceKind::Settlement => fp.settlements -= count,
                _ => unreachable!(),
            }
            let dst = state.regions.entry(to_region).or_default().faction_mut(faction);
            match kind {
                PieceKind::Fort => dst.forts += count,
                PieceKind::Ally => dst.allies += count,
                PieceKind::Citadel => dst.citadels += count,
                PieceKind::Settlement => dst.settlements += count,
                _ => unreachable!(),
            }
            Ok(())
        }
        PieceKind::Auxilia | PieceKind::Warband => {
            let ps = piece_state.unwrap_or(PieceState::Hidden);
            let src = state.regions.entry(from_region).or_default();
            let src_counts = src.faction_mut(faction).flippable_mut(kind).expect("flippable kind");
            let current = src_counts.get(ps);
            if current < count {
                return Err(not_present(format!(
                    "only {} {:?} {:?} {:?} in {:?}, need {}",
                    current, faction, ps, kind, from_region, count
                )));
            }
            *src_counts.get_mut(ps) -= count;
            let dst = state.regions.entry(to_region).or_default().faction_mut(faction);
            *dst.flippable_mut(kind).expect("flippable kind").get_mut(ps) += count;
            Ok(())
        }
    }
}

/// Flip flippable pieces between states. `Scouted -> Hidden` is
/// reinterpreted as `Scouted -> Revealed` (the marker is stripped rather
/// than re-hiding the piece).
pub fn flip(
    state: &mut State,
    region: Region,
    faction: Faction,
    kind: PieceKind,
    count: u32,
    from_state: PieceState,
    to_state: PieceState,
) -> Result<(), EngineError> {
    if !kind.is_flippable() {
        return Err(EngineError::UnknownPieceKind(format!("{:?} cannot be flipped", kind)));
    }
    if from_state == to_state || count == 0 {
        return Ok(());
    }
    let actual_to = if from_state == PieceState::Scouted && to_state == PieceState::Hidden {
        PieceState::Revealed
    } else {
        to_state
    };

    let cell = state.regions.entry(region).or_default();
    let counts = cell.faction_mut(faction).flippable_mut(kind).expect("flippable kind");
    let current = counts.get(from_state);
    if current < count {
        return Err(not_present(format!(
            "only {} {:?} {:?} {:?} in {:?}, need {}",
            current, faction, from_state, kind, region, count
        )));
    }
    *counts.get_mut(from_state) -= count;
    *counts.get_mut(actual_to) += count;
    Ok(())
}

pub fn count(state: &State, region: Region, faction: Faction, kind: PieceKind) -> u32 {
    let fp = state.regions.get(&region).map(|c| c.faction(faction)).cloned().unwrap_or_default();
    match kind {
        PieceKind::Leader => fp.leader.is_some() as u32,
        PieceKind::Legion => fp.legions,
        PieceKind::Fort => fp.forts,
        PieceKind::Ally => fp.allies,
        PieceKind::Citadel => fp.citadels,
        PieceKind::Settlement => fp.settlements,
        PieceKind::Auxilia => fp.auxilia.total(),
        PieceKind::Warband => fp.warbands.total(),
    }
}

pub fn count_by_state(state: &State, region: Region, faction: Faction, kind: PieceKind, piece_state: PieceState) -> u32 {
    state
        .regions
        .get(&region)
        .and_then(|c| c.faction(faction).flippable(kind))
        .map(|counts| counts.get(piece_state))
        .unwrap_or(0)
}

pub fn available(state: &State, faction: Faction, kind: PieceKind) -> u32 {
    if kind == PieceKind::Legion {
        return state.legions_on_track();
    }
    state.available(faction, kind)
}

pub fn leader_in_region(state: &State, region: Region, faction: Faction) -> Option<Leader> {
    state.regions.get(&region).and_then(|c| c.faction(faction).leader)
}

pub fn find_leader(state: &State, faction: Faction) -> Option<Region> {
    state.regions.iter().find(|(_, cell)| cell.faction(faction).leader.is_some()).map(|(region, _)| *region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;

    fn setup() -> State {
        State::new_empty(Scenario::GreatRevolt, 1)
    }

    #[test]
    fn place_and_remove_warband_round_trips_available() {
        let mut state = setup();
        let before = available(&state, Faction::Arverni, PieceKind::Warband);
        place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 1, None, None, None).unwrap();
        assert_eq!(available(&state, Faction::Arverni, PieceKind::Warband), before - 1);
        assert_eq!(count(&state, Region::Arverni, Faction::Arverni, PieceKind::Warband), 1);
        remove(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 1, true, None, None).unwrap();
        assert_eq!(available(&state, Faction::Arverni, PieceKind::Warband), before);
        assert_eq!(count(&state, Region::Arverni, Faction::Arverni, PieceKind::Warband), 0);
    }

    #[test]
    fn legion_placement_requires_explicit_source() {
        let mut state = setup();
        let err = place(&mut state, Region::Provincia, Faction::Romans, PieceKind::Legion, 1, None, None, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAction { .. }));
    }

    #[test]
    fn legion_removal_defaults_to_fallen() {
        let mut state = setup();
        place(
            &mut state,
            Region::Provincia,
            Faction::Romans,
            PieceKind::Legion,
            2,
            None,
            Some(LegionSource::Track),
            None,
        )
        .unwrap();
        remove(&mut state, Region::Provincia, Faction::Romans, PieceKind::Legion, 1, true, None, None).unwrap();
        assert_eq!(state.fallen_legions, 1);
    }

    #[test]
    fn provincia_fort_is_protected() {
        let mut state = setup();
        place(&mut state, Region::Provincia, Faction::Romans, PieceKind::Fort, 1, None, None, None).unwrap();
        let err = remove(&mut state, Region::Provincia, Faction::Romans, PieceKind::Fort, 1, true, None, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::PermanentFortProtection));
    }

    #[test]
    fn scouted_flip_to_hidden_becomes_revealed() {
        let mut state = setup();
        place(
            &mut state,
            Region::Arverni,
            Faction::Arverni,
            PieceKind::Warband,
            1,
            None,
            None,
            Some(PieceState::Scouted),
        )
        .unwrap();
        flip(
            &mut state,
            Region::Arverni,
            Faction::Arverni,
            PieceKind::Warband,
            1,
            PieceState::Scouted,
            PieceState::Hidden,
        )
        .unwrap();
        assert_eq!(count_by_state(&state, Region::Arverni, Faction::Arverni, PieceKind::Warband, PieceState::Revealed), 1);
        assert_eq!(count_by_state(&state, Region::Arverni, Faction::Arverni, PieceKind::Warband, PieceState::Scouted), 0);
    }

    #[test]
    fn diviciacus_removal_never_returns_to_available() {
        let mut state = setup();
        place(
            &mut state,
            Region::Aedui,
            Faction::Aedui,
            PieceKind::Leader,
            1,
            Some(Leader::Diviciacus),
            None,
            None,
        )
        .unwrap();
        let before = available(&state, Faction::Aedui, PieceKind::Leader);
        remove(&mut state, Region::Aedui, Faction::Aedui, PieceKind::Leader, 1, true, None, None).unwrap();
        assert_eq!(available(&state, Faction::Aedui, PieceKind::Leader), before);
    }
}
