//! Trade (spec §4.4 table), Aedui only: income for Allies/Citadels,
//! Subdued tribes in supply-line regions, and an optional Roman bonus.

use crate::catalog::caps;
use crate::catalog::pieces::PieceKind;
use crate::catalog::tribes::TribeStatus;
use crate::map::Map;
use crate::pieces;
use crate::power::Faction;
use crate::state::State;

use crate::commands::common;

pub fn trade(state: &mut State, map: &Map, romans_agreed: bool) -> u32 {
    let allies_and_citadels: u32 = crate::catalog::Region::ALL
        .into_iter()
        .map(|r| pieces::count(state, r, Faction::Aedui, PieceKind::Ally) + pieces::count(state, r, Faction::Aedui, PieceKind::Citadel))
        .sum();

    let supplied_subdued = state
        .tribes
        .iter()
        .filter(|(tribe, record)| {
            record.status == TribeStatus::Subdued
                && map.has_supply_line_to_cisalpina(state, tribe.home_region(), Faction::Aedui)
        })
        .count() as u32;

    let roman_allies: u32 =
        crate::catalog::Region::ALL.into_iter().map(|r| pieces::count(state, r, Faction::Romans, PieceKind::Ally)).sum();
    let roman_bonus_per_ally = if romans_agreed { 2 } else { 1 };
    let roman_income = if romans_agreed { roman_allies * roman_bonus_per_ally } else { 0 };

    let total = allies_and_citadels * caps::HARVEST_PER_ALLY_OR_CITADEL + supplied_subdued + roman_income;
    common::gain(state, Faction::Aedui, total);
    total
}
