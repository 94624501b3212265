//! Build (spec §4.4 table), Romans only: place a Fort and/or Subdue a
//! tribe / place a Roman Ally at a Subdued tribe, each costing 2.

use crate::catalog::caps;
use crate::catalog::pieces::PieceKind;
use crate::catalog::tribes::{Tribe, TribeStatus};
use crate::catalog::Region;
use crate::control;
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common;

pub struct BuildRequest {
    pub fort_region: Option<Region>,
    /// Tribe to Subdue or to place a Roman Ally at — must already be
    /// Allied for a Subdue, or Subdued for an Ally placement.
    pub ally_tribe: Option<Tribe>,
    pub seize_target: Option<Region>,
}

pub fn build(state: &mut State, faction: Faction, req: &BuildRequest) -> Result<u32, EngineError> {
    if faction != Faction::Romans {
        return Err(EngineError::EligibilityViolation { reason: "only Romans may Build".into() });
    }
    let mut cost = 0;
    if req.fort_region.is_some() {
        cost += caps::BUILD_FORT_COST;
    }
    if req.ally_tribe.is_some() {
        cost += caps::BUILD_SUBDUE_OR_ALLY_COST;
    }
    common::spend(state, faction, cost)?;

    if let Some(region) = req.fort_region {
        pieces::place(state, region, faction, PieceKind::Fort, 1, None, None, None)?;
    }
    if let Some(tribe) = req.ally_tribe {
        let region = tribe.home_region();
        if !control::is_controlled_by(state, region, Faction::Romans) || Some(region) == req.seize_target {
            return Err(EngineError::ProximityViolation {
                reason: "Build's Ally/Subdue step requires Roman Control and not the Seize target".into(),
            });
        }
        let status = state.tribes.entry(tribe).or_default().status;
        match status {
            TribeStatus::Allied => {
                let record = state.tribes.entry(tribe).or_default();
                record.status = TribeStatus::Subdued;
                let faction_there = record.allied_faction.take();
                if let Some(f) = faction_there {
                    pieces::remove(state, region, f, PieceKind::Ally, 1, true, None, None)?;
                }
            }
            TribeStatus::Subdued => {
                pieces::place(state, region, Faction::Romans, PieceKind::Ally, 1, None, None, None)?;
                let record = state.tribes.entry(tribe).or_default();
                record.status = TribeStatus::Allied;
                record.allied_faction = Some(Faction::Romans);
            }
            _ => {
                return Err(EngineError::InvalidAction { reason: format!("{:?} cannot be Built on in its current status", tribe) });
            }
        }
    }
    control::refresh_all(state);
    Ok(cost)
}
