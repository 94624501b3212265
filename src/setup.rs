//! Scenario setup (spec §3 "State is constructed by a scenario-setup
//! function"). Builds the empty skeleton, places every starting piece
//! through [`crate::pieces`], sets Senate/resources/tribe allegiances and
//! the deck, then asserts the invariant validator passes. Grounded on the
//! Order-of-Battle-table shape of the teacher's `setup.rs`, scaled down to
//! this game's five-faction starting position since no starting-OOB table
//! survived the extraction for this component.

use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::tribes::{Tribe, TribeStatus};
use crate::catalog::{Region, Ruleset, Scenario};
use crate::dice::DeterministicRng;
use crate::error::EngineError;
use crate::pieces::{self, LegionSource};
use crate::power::Faction;
use crate::state::{State, TribeRecord};

const AEDUI_HOME: [Region; 1] = [Region::Aedui];
const BELGAE_HOME: [Region; 3] = [Region::Morini, Region::Nervii, Region::Atrebates];
const GERMANIA: [Region; 2] = [Region::Sugambri, Region::Ubii];

/// Builds the starting state for `scenario` and shuffles a fresh deck
/// seeded from `rng`. Panics only via the final `State::validate()`
/// assertion, which signals a setup bug rather than a domain error.
pub fn new_game(scenario: Scenario, seed: u64) -> Result<State, EngineError> {
    let mut state = State::new_empty(scenario, seed);
    let mut rng = state.rng_state.rng();

    place_romans(&mut state)?;
    place_arverni(&mut state)?;
    place_aedui(&mut state)?;
    place_belgae(&mut state)?;
    if scenario.ruleset() == Ruleset::Ariovistus {
        place_germans_ariovistus(&mut state)?;
    } else {
        place_germans_base(&mut state)?;
    }

    seed_tribe_allegiances(&mut state);
    state.deck = build_deck(scenario, &mut rng);
    state.rng_state.advance_past(&rng);

    crate::control::refresh_all(&mut state);
    let errors = state.validate();
    if !errors.is_empty() {
        return Err(EngineError::InvariantViolation(errors));
    }
    Ok(state)
}

fn place_romans(state: &mut State) -> Result<(), EngineError> {
    pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Leader, 1, Some(Leader::Caesar), None, None)?;
    pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Fort, 1, None, None, None)?;
    pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Legion, 4, None, Some(LegionSource::Track), None)?;
    pieces::place(state, Region::Provincia, Faction::Romans, PieceKind::Auxilia, 2, None, None, Some(PieceState::Hidden))?;
    Ok(())
}

fn place_arverni(state: &mut State) -> Result<(), EngineError> {
    pieces::place(state, Region::Arverni, Faction::Arverni, PieceKind::Leader, 1, Some(Leader::Vercingetorix), None, None)?;
    pieces::place(state, Region::Arverni, Faction::Arverni, PieceKind::Warband, 6, None, None, Some(PieceState::Hidden))?;
    pieces::place(state, Region::Arverni, Faction::Arverni, PieceKind::Ally, 1, None, None, None)?;
    Ok(())
}

fn place_aedui(state: &mut State) -> Result<(), EngineError> {
    pieces::place(state, Region::Aedui, Faction::Aedui, PieceKind::Leader, 1, Some(Leader::Diviciacus), None, None)?;
    for region in AEDUI_HOME {
        pieces::place(state, region, Faction::Aedui, PieceKind::Warband, 3, None, None, Some(PieceState::Hidden))?;
    }
    Ok(())
}

fn place_belgae(state: &mut State) -> Result<(), EngineError> {
    pieces::place(state, Region::Nervii, Faction::Belgae, PieceKind::Leader, 1, Some(Leader::Ambiorix), None, None)?;
    for region in BELGAE_HOME {
        pieces::place(state, region, Faction::Belgae, PieceKind::Warband, 3, None, None, Some(PieceState::Hidden))?;
    }
    Ok(())
}

/// Base ruleset: Germans are non-player and start only in Germania.
fn place_germans_base(state: &mut State) -> Result<(), EngineError> {
    for region in GERMANIA {
        pieces::place(state, region, Faction::Germans, PieceKind::Warband, 4, None, None, Some(PieceState::Hidden))?;
    }
    Ok(())
}

/// Ariovistus ruleset: Germans are a seated player with a Leader and an
/// initial Settlement.
fn place_germans_ariovistus(state: &mut State) -> Result<(), EngineError> {
    pieces::place(state, Region::Ubii, Faction::Germans, PieceKind::Leader, 1, Some(Leader::Ariovistus), None, None)?;
    pieces::place(state, Region::Ubii, Faction::Germans, PieceKind::Settlement, 1, None, None, None)?;
    for region in GERMANIA {
        pieces::place(state, region, Faction::Germans, PieceKind::Warband, 3, None, None, Some(PieceState::Hidden))?;
    }
    Ok(())
}

/// Every tribe starts Subdued except the ones sitting under a faction's
/// starting Ally/Leader region, which start Allied to that faction.
fn seed_tribe_allegiances(state: &mut State) {
    for tribe in Tribe::ALL {
        let home = tribe.home_region();
        let allied_to = Faction::ALL.into_iter().find(|&f| pieces::count(state, home, f, PieceKind::Ally) > 0);
        let record = match allied_to {
            Some(faction) => TribeRecord { allied_faction: Some(faction), status: TribeStatus::Allied },
            None => TribeRecord { allied_faction: None, status: TribeStatus::Subdued },
        };
        state.tribes.insert(tribe, record);
    }
}

/// Builds a deterministically shuffled deck: one entry per registered
/// event-card id (spec §6.2's handler registry) plus one Winter card per
/// `Scenario::winter_rounds`, interleaved roughly evenly through the deck
/// (Winter cards are never adjacent, mirroring a physical deck's seeding).
fn build_deck(scenario: Scenario, rng: &mut DeterministicRng) -> Vec<u32> {
    const EVENT_CARD_COUNT: u32 = 6;
    const WINTER_CARD_ID: u32 = 0;

    let mut cards: Vec<u32> = (1..=EVENT_CARD_COUNT).collect();
    for i in (1..cards.len()).rev() {
        let j = rng.pick_index(i + 1);
        cards.swap(i, j);
    }

    let winter_rounds = scenario.winter_rounds();
    let segment = (cards.len() as u32 / (winter_rounds + 1)).max(1) as usize;
    let mut deck = Vec::with_capacity(cards.len() + winter_rounds as usize);
    let mut inserted = 0u32;
    for (i, card) in cards.into_iter().enumerate() {
        deck.push(card);
        if inserted < winter_rounds && (i + 1) % segment == 0 {
            deck.push(WINTER_CARD_ID);
            inserted += 1;
        }
    }
    while inserted < winter_rounds {
        deck.push(WINTER_CARD_ID);
        inserted += 1;
    }
    deck
}
