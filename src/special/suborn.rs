//! Suborn (spec §4.4 table), Aedui only: up to 3 operations placing or
//! removing pieces of any faction, gated by a Hidden Aedui Warband.

use crate::catalog::caps;
use crate::catalog::pieces::{PieceKind, PieceState};
use crate::catalog::tribes::Tribe;
use crate::catalog::Region;
use crate::control;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common;

pub enum SubornOp {
    RemovePiece { faction: Faction, kind: PieceKind },
    PlacePiece { faction: Faction, kind: PieceKind },
    PlaceAlly { tribe: Tribe },
}

pub fn suborn(state: &mut State, region: Region, ops: &[SubornOp]) -> Result<u32, EngineError> {
    if pieces::count_by_state(state, region, Faction::Aedui, PieceKind::Warband, PieceState::Hidden) == 0 {
        return Err(EngineError::ProximityViolation { reason: "Suborn requires a Hidden Aedui Warband in the region".into() });
    }
    if ops.len() as u32 > caps::SUBORN_MAX_OPERATIONS {
        return Err(EngineError::InvalidAction { reason: "Suborn allows at most 3 operations".into() });
    }
    let ally_ops = ops.iter().filter(|op| matches!(op, SubornOp::PlaceAlly { .. })).count();
    if ally_ops > 1 {
        return Err(EngineError::InvalidAction { reason: "Suborn allows at most 1 Ally operation".into() });
    }

    let mut total_cost = 0;
    for op in ops {
        total_cost += match op {
            SubornOp::PlaceAlly { .. } => caps::SUBORN_COST_PER_ALLY,
            _ => caps::SUBORN_COST_PER_WARBAND_OR_AUXILIA,
        };
    }
    common::spend(state, Faction::Aedui, total_cost)?;

    for op in ops {
        match op {
            SubornOp::RemovePiece { faction, kind } => {
                pieces::remove(state, region, *faction, *kind, 1, true, None, None)?;
            }
            SubornOp::PlacePiece { faction, kind } => {
                pieces::place(state, region, *faction, *kind, 1, None, None, None)?;
            }
            SubornOp::PlaceAlly { tribe } => {
                if tribe.home_region() != region {
                    return Err(EngineError::ProximityViolation { reason: "Ally placement must match the tribe's home region".into() });
                }
                pieces::place(state, region, Faction::Aedui, PieceKind::Ally, 1, None, None, None)?;
                let record = state.tribes.entry(*tribe).or_default();
                record.status = crate::catalog::tribes::TribeStatus::Allied;
                record.allied_faction = Some(Faction::Aedui);
            }
        }
    }
    control::refresh_all(state);
    Ok(total_cost)
}
