//! Seize (spec §4.3.4), Roman-only: a four-step ordered sub-procedure run
//! per targeted region.

use crate::catalog::caps;
use crate::catalog::tribes::{Tribe, TribeStatus};
use crate::catalog::Region;
use crate::control;
use crate::dice::DeterministicRng;
use crate::error::EngineError;
use crate::power::Faction;
use crate::state::State;

use super::common;
use super::march::apply_harassment;

/// Outcome of one Seize: resources foraged, and the set of tribes that
/// were freshly Dispersed (each paired with an adjacent region where the
/// rules grant Arverni/Belgae a free Rally opportunity — surfaced to the
/// caller rather than auto-executed, since it requires its own policy
/// decision).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeizeOutcome {
    pub dispersed: Vec<Tribe>,
    pub free_rally_opportunities: Vec<(Faction, Region)>,
    pub forage_income: u32,
}

fn dispersed_count(state: &State) -> u32 {
    state.tribes.values().filter(|r| r.status == TribeStatus::Dispersed).count() as u32
}

pub fn seize(state: &mut State, map: &crate::map::Map, region: Region, rng: &mut DeterministicRng) -> Result<SeizeOutcome, EngineError> {
    if !control::is_controlled_by(state, region, Faction::Romans) {
        return Err(EngineError::ProximityViolation { reason: format!("{:?} is not Roman-Controlled", region) });
    }

    let mut outcome = SeizeOutcome::default();

    // Step 1: Dispersal.
    let mut budget_remaining = caps::DISPERSED_MARKER_BUDGET.saturating_sub(dispersed_count(state));
    let tribes_here: Vec<Tribe> = Tribe::ALL.into_iter().filter(|t| t.home_region() == region).collect();
    for tribe in tribes_here {
        if budget_remaining == 0 {
            break;
        }
        let record = state.tribes.entry(tribe).or_default();
        if record.status == TribeStatus::Subdued {
            record.status = TribeStatus::Dispersed;
            outcome.dispersed.push(tribe);
            budget_remaining -= 1;
        }
    }

    // Step 2: Rally-check — surface the opportunity, do not execute it.
    for tribe in &outcome.dispersed {
        for neighbor in map.neighbors(tribe.home_region()) {
            for faction in [Faction::Arverni, Faction::Belgae] {
                outcome.free_rally_opportunities.push((faction, neighbor));
            }
        }
    }

    // Step 3: Forage.
    let subdued = state.tribes.values().filter(|r| r.status == TribeStatus::Subdued).count() as u32;
    let dispersed = dispersed_count(state);
    outcome.forage_income = subdued * caps::FORAGE_PER_SUBDUED + dispersed * caps::FORAGE_PER_DISPERSED;
    common::gain(state, Faction::Romans, outcome.forage_income);

    // Step 4: Harassment.
    apply_harassment(state, region, Faction::Romans, rng)?;

    control::refresh_all(state);
    Ok(outcome)
}
