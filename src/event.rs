//! Card-effect dispatcher (spec §6.2). `execute_event` looks up a
//! per-card handler by id; each handler is a pure function of
//! `(state, params)` that mutates state via [`crate::pieces`] /
//! [`crate::commands`] and may set `state.event_modifiers` flags for the
//! remainder of the card turn. Grounded on the handler-registry pattern
//! in the teacher's `cards.rs` (one function pointer per card id) rather
//! than a giant match, since the card count here is open-ended.

use crate::action::CardParams;
use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::{caps, Marker};
use crate::error::EngineError;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

type Handler = fn(&mut State, bool, &CardParams) -> Result<(), EngineError>;

/// Looks up and runs the handler for `card_id`. Unknown ids are a
/// programmer error in the deck builder, not a recoverable player
/// mistake, so this returns `InvariantViolation` rather than a domain
/// error.
pub fn execute_event(state: &mut State, card_id: u32, shaded: bool, params: &CardParams) -> Result<(), EngineError> {
    let handler: Handler = match card_id {
        1 => ambiorix_revolt,
        2 => vercingetorix_elected,
        3 => winter_campaign,
        4 => diplomatic_immunity,
        5 => bituriges_uprising,
        6 => hostages,
        id => return Err(EngineError::InvariantViolation(vec![format!("no handler registered for card {id}")])),
    };
    handler(state, shaded, params)
}

/// Card 1 — Ambiorix's Revolt. Unshaded: Belgae places 2 Hidden Warbands
/// in a Belgic-home region at no cost. Shaded: that region's March cost
/// for everyone else is doubled for this card turn (an event-modifier
/// flag consumed by `commands::march`'s cost computation).
fn ambiorix_revolt(state: &mut State, shaded: bool, params: &CardParams) -> Result<(), EngineError> {
    let region = params.region.ok_or_else(|| EngineError::InvalidAction { reason: "card 1 requires a region".into() })?;
    if shaded {
        state.event_modifiers.insert("march_cost_doubled".into(), 1);
        Ok(())
    } else {
        pieces::place(state, region, Faction::Belgae, PieceKind::Warband, 2, None, None, Some(PieceState::Hidden))
    }
}

/// Card 2 — Vercingetorix Elected. Unshaded: place the Arverni Leader in
/// the named region if not already on the map. Shaded: the Arverni
/// Successor replaces a removed Leader immediately rather than waiting
/// for the normal Rally restore, flagged for `commands::rally` to read.
fn vercingetorix_elected(state: &mut State, shaded: bool, params: &CardParams) -> Result<(), EngineError> {
    let region = params.region.ok_or_else(|| EngineError::InvalidAction { reason: "card 2 requires a region".into() })?;
    if shaded {
        state.event_modifiers.insert("immediate_successor".into(), 1);
        Ok(())
    } else {
        if pieces::find_leader(state, Faction::Arverni).is_some() {
            return Err(EngineError::InvalidAction { reason: "Vercingetorix is already on the map".into() });
        }
        pieces::place(state, region, Faction::Arverni, PieceKind::Leader, 1, Some(Leader::Vercingetorix), None, None)
    }
}

/// Card 3 — Winter Campaign. Unshaded: set Frost immediately (normally a
/// Winter-only marker) for the remainder of this card. Shaded: the next
/// Quarters phase's per-region cost is doubled everywhere.
fn winter_campaign(state: &mut State, shaded: bool, _params: &CardParams) -> Result<(), EngineError> {
    if shaded {
        state.event_modifiers.insert("quarters_doubled_next".into(), 1);
    } else {
        state.frost = true;
    }
    Ok(())
}

/// Card 4 — Diplomatic Immunity. Unshaded: the named faction becomes
/// Eligible even if it was marked Ineligible this card. Shaded: that
/// faction is forced Ineligible for the remainder of this card.
fn diplomatic_immunity(state: &mut State, shaded: bool, params: &CardParams) -> Result<(), EngineError> {
    let faction = params.faction.ok_or_else(|| EngineError::InvalidAction { reason: "card 4 requires a faction".into() })?;
    let value = if shaded { crate::state::Eligibility::Ineligible } else { crate::state::Eligibility::Eligible };
    state.eligibility.insert(faction, value);
    Ok(())
}

/// Card 5 — Bituriges Uprising. Unshaded: Subdue the Bituriges tribe's
/// region to Arverni for free (bypassing the usual Rally cost). Shaded:
/// Devastated marker placed on that region instead.
fn bituriges_uprising(state: &mut State, shaded: bool, params: &CardParams) -> Result<(), EngineError> {
    let region = params.region.ok_or_else(|| EngineError::InvalidAction { reason: "card 5 requires a region".into() })?;
    if shaded {
        state.regions.entry(region).or_default().set_marker(Marker::Devastated);
    } else {
        pieces::place(state, region, Faction::Arverni, PieceKind::Ally, 1, None, None, None)?;
    }
    Ok(())
}

/// Card 6 — Hostages. Unshaded: Romans gain resources equal to the
/// Subdue-cost constant without spending a Command. Shaded: Romans must
/// discard the same amount (floor at 0).
fn hostages(state: &mut State, shaded: bool, _params: &CardParams) -> Result<(), EngineError> {
    let delta = caps::BUILD_SUBDUE_OR_ALLY_COST;
    let current = *state.resources.get(&Faction::Romans).unwrap_or(&0);
    let next = if shaded { current.saturating_sub(delta) } else { (current + delta).min(caps::RESOURCE_CAP) };
    state.resources.insert(Faction::Romans, next);
    Ok(())
}
