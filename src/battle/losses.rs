//! `resolve_losses`: the inner loss-absorption procedure shared by attack
//! and counterattack resolution (spec §4.5 "Loss resolution"). Grounded on
//! the constant names surviving in `fs_bot/battle/losses.py`
//! (`HARD_TARGET_PIECES`, `MOBILE_PIECES`, `LOSS_ROLL_THRESHOLD`,
//! `DIVICIACUS_LOSS_ROLL_THRESHOLD`); the procedure body itself was not in
//! the extraction and is implemented from spec §4.5's prose.

use crate::catalog::caps;
use crate::catalog::pieces::{Leader, PieceKind};
use crate::catalog::Region;
use crate::dice::DeterministicRng;
use crate::error::EngineError;
use crate::pieces::{self, LegionSink};
use crate::power::Faction;
use crate::state::State;

/// Default absorption order when the owner supplies none: mobile, non-hard
/// pieces absorb first; hard targets are tried only once nothing else is
/// left, with Forts/Citadels the very last resort.
const DEFAULT_PRIORITY: [PieceKind; 8] = [
    PieceKind::Warband,
    PieceKind::Auxilia,
    PieceKind::Leader,
    PieceKind::Legion,
    PieceKind::Settlement,
    PieceKind::Ally,
    PieceKind::Fort,
    PieceKind::Citadel,
];

fn present_count(state: &State, region: Region, faction: Faction, kind: PieceKind) -> u32 {
    pieces::count(state, region, faction, kind)
}

fn loss_threshold(state: &State, region: Region, faction: Faction) -> u8 {
    match pieces::leader_in_region(state, region, faction) {
        Some(Leader::Diviciacus) => caps::DIVICIACUS_LOSS_ROLL_THRESHOLD,
        _ => caps::LOSS_ROLL_THRESHOLD,
    }
}

/// Remove one piece of `kind` from `region`, routing Legions to Fallen.
fn remove_one(state: &mut State, region: Region, faction: Faction, kind: PieceKind) -> Result<(), EngineError> {
    if kind == PieceKind::Legion {
        pieces::remove(state, region, faction, kind, 1, false, Some(LegionSink::Fallen), None)
    } else {
        pieces::remove(state, region, faction, kind, 1, true, None, None)
    }
}

/// Resolve `loss_count` losses against `losing_faction` in `region`.
/// Returns the kinds actually removed, in removal order. `loss_order`, if
/// given, overrides `DEFAULT_PRIORITY` — a Fort-removal attempt on
/// Provincia that raises `PermanentFortProtection` is skipped and the next
/// priority candidate is tried instead (spec §4.5 "Invariants and edge
/// cases").
pub fn resolve_losses(
    state: &mut State,
    region: Region,
    losing_faction: Faction,
    loss_count: u32,
    is_ambush: bool,
    rng: &mut DeterministicRng,
    loss_order: Option<&[PieceKind]>,
) -> Result<Vec<PieceKind>, EngineError> {
    let priority: Vec<PieceKind> = loss_order.map(|o| o.to_vec()).unwrap_or_else(|| DEFAULT_PRIORITY.to_vec());
    let mut removed = Vec::new();

    for _ in 0..loss_count {
        let candidates: Vec<PieceKind> =
            priority.iter().copied().filter(|k| present_count(state, region, losing_faction, *k) > 0).collect();
        let Some(&first) = candidates.first() else {
            break;
        };

        if !first.is_hard_target() {
            try_remove_with_fallback(state, region, losing_faction, &candidates, 0, &mut removed)?;
            continue;
        }

        if is_ambush {
            try_remove_with_fallback(state, region, losing_faction, &candidates, 0, &mut removed)?;
            continue;
        }

        let threshold = loss_threshold(state, region, losing_faction);
        let roll = rng.roll_d6();
        if roll <= threshold {
            try_remove_with_fallback(state, region, losing_faction, &candidates, 0, &mut removed)?;
        } else {
            // The hard target survives the roll; the owner must pick a
            // non-hard piece instead. If none remain, the hard piece falls
            // anyway.
            if let Some(idx) = candidates.iter().position(|k| !k.is_hard_target()) {
                try_remove_with_fallback(state, region, losing_faction, &candidates, idx, &mut removed)?;
            } else {
                try_remove_with_fallback(state, region, losing_faction, &candidates, 0, &mut removed)?;
            }
        }
    }

    Ok(removed)
}

/// Attempt to remove `candidates[start]`; on `PermanentFortProtection`,
/// fall through to the next candidate.
fn try_remove_with_fallback(
    state: &mut State,
    region: Region,
    faction: Faction,
    candidates: &[PieceKind],
    start: usize,
    removed: &mut Vec<PieceKind>,
) -> Result<(), EngineError> {
    for kind in &candidates[start..] {
        match remove_one(state, region, faction, *kind) {
            Ok(()) => {
                removed.push(*kind);
                return Ok(());
            }
            Err(EngineError::PermanentFortProtection) => continue,
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Scenario;
    use crate::dice::DeterministicRng;

    fn setup() -> State {
        State::new_empty(Scenario::GreatRevolt, 1)
    }

    #[test]
    fn ambush_removes_hard_targets_directly() {
        let mut state = setup();
        pieces::place(&mut state, Region::Arverni, Faction::Romans, PieceKind::Legion, 1, None, Some(pieces::LegionSource::Track), None).unwrap();
        let mut rng = DeterministicRng::new(1, 0);
        let removed = resolve_losses(&mut state, Region::Arverni, Faction::Romans, 1, true, &mut rng, None).unwrap();
        assert_eq!(removed, vec![PieceKind::Legion]);
        assert_eq!(state.fallen_legions, 1);
    }

    #[test]
    fn mobile_pieces_absorb_before_hard_targets() {
        let mut state = setup();
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 3, None, None, None).unwrap();
        pieces::place(&mut state, Region::Arverni, Faction::Arverni, PieceKind::Leader, 1, Some(Leader::Vercingetorix), None, None).unwrap();
        let mut rng = DeterministicRng::new(1, 0);
        let removed = resolve_losses(&mut state, Region::Arverni, Faction::Arverni, 1, false, &mut rng, None).unwrap();
        assert_eq!(removed, vec![PieceKind::Warband]);
    }
}
