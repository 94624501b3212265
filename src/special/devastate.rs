//! Devastate (spec §4.4 table), Arverni base-game only.

use crate::catalog::pieces::PieceKind;
use crate::catalog::{caps, Marker, Region};
use crate::control;
use crate::error::EngineError;
use crate::pieces::{self, LegionSink};
use crate::power::Faction;
use crate::state::State;

fn remove_fraction(state: &mut State, region: Region, faction: Faction, kind: PieceKind, numerator: u32, denominator: u32) -> Result<(), EngineError> {
    let present = pieces::count(state, region, faction, kind);
    let to_remove = (present * numerator) / denominator;
    if to_remove == 0 {
        return Ok(());
    }
    if kind == PieceKind::Legion {
        pieces::remove(state, region, faction, kind, to_remove, false, Some(LegionSink::Fallen), None)
    } else {
        pieces::remove(state, region, faction, kind, to_remove, true, None, None)
    }
}

pub fn devastate(state: &mut State, region: Region) -> Result<(), EngineError> {
    if !control::is_controlled_by(state, region, Faction::Arverni) {
        return Err(EngineError::ProximityViolation { reason: "Devastate requires Arverni Control".into() });
    }
    let (an, ad) = caps::DEVASTATE_ARVERNI_FRACTION;
    remove_fraction(state, region, Faction::Arverni, PieceKind::Warband, an, ad)?;

    let (on, od) = caps::DEVASTATE_OTHER_FRACTION;
    for faction in Faction::ALL {
        if faction == Faction::Arverni {
            continue;
        }
        for kind in [PieceKind::Legion, PieceKind::Auxilia, PieceKind::Warband] {
            remove_fraction(state, region, faction, kind, on, od)?;
        }
    }

    state.regions.entry(region).or_default().set_marker(Marker::Devastated);
    control::refresh_all(state);
    Ok(())
}
