//! Numeric tables: per-(scenario, faction, kind) caps, command costs, and
//! the assorted thresholds referenced throughout §4. Names mirror the
//! `CAPS_BASE`/`CAPS_ARIOVISTUS`, `QUARTERS_*`, `SENATE_SHIFT_*` constants
//! confirmed (as names, not bodies) in `fs_bot/engine/winter.py` and
//! `fs_bot/rules_consts.py`.

use super::pieces::PieceKind;
use super::Scenario;
use crate::power::Faction;

/// Resources are capped at 45 regardless of scenario (spec §3 invariant 5).
pub const RESOURCE_CAP: u32 = 45;

/// Legions per Legions-track row; three rows give a 6-Legion track,
/// matching the Roman Legion cap below.
pub const LEGIONS_PER_ROW: u32 = 2;

/// Maximum simultaneous Dispersed markers on the board (spec invariant 8).
pub const DISPERSED_MARKER_BUDGET: u32 = 4;

pub const MAX_FORTS_PER_REGION: u32 = 1;
pub const MAX_SETTLEMENTS_PER_REGION: u32 = 1;

/// Die-roll thresholds (roll <= threshold means the hard target absorbs
/// the loss; spec §4.5 Step 3 / §4.5 loss resolution).
pub const LOSS_ROLL_THRESHOLD: u8 = 3;
pub const DIVICIACUS_LOSS_ROLL_THRESHOLD: u8 = 2;

/// Caesar's ambush save-roll thresholds (spec §4.5 Step 3 Caesar-defending
/// exception): rolling at-or-above the threshold restores normal rolls and
/// unlocks the counterattack.
pub const CAESAR_AMBUSH_ROLL_THRESHOLD: u8 = 4;
pub const CAESAR_BELGIC_AMBUSH_ROLL_THRESHOLD: u8 = 5;

/// Germans-in-Sugambri relocation threshold used by the Quarters phase.
pub const GERMAN_QUARTERS_SUGAMBRI_THRESHOLD: u32 = 4;

/// Desertion roll: a piece without paid Quarters/supply deserts on a roll
/// <= this threshold.
pub const DESERTION_ROLL_THRESHOLD: u8 = 2;

/// Senate-shift Fallen-Legion thresholds (spec §4.8.5(a)).
pub const SENATE_SHIFT_LOW_THRESHOLD: u32 = 6;
pub const SENATE_SHIFT_HIGH_THRESHOLD: u32 = 12;

/// Harassment: a March or Seize target needs at least this many Hidden
/// enemy Warbands present before Harassment can trigger; losses scale at
/// one loss per this many Warbands (spec §4.3.2 "Harassment").
pub const HARASSMENT_WARBAND_THRESHOLD: u32 = 2;

/// Per-(faction, kind) cap. Faction/kind combinations that do not exist in
/// the given scenario (e.g. Settlements outside Ariovistus) return 0.
pub fn cap(scenario: Scenario, faction: Faction, kind: PieceKind) -> u32 {
    use Faction::*;
    use PieceKind::*;
    match (faction, kind) {
        (Romans, Leader) => 1,
        (Romans, Legion) => 6,
        (Romans, Auxilia) => 8,
        (Romans, Fort) => 4,
        (Romans, Ally) => 8,
        (Arverni, Leader) => 1,
        (Arverni, Warband) => 28,
        (Arverni, Ally) => 8,
        (Arverni, Citadel) => 2,
        (Aedui, Leader) => 1,
        (Aedui, Warband) => 20,
        (Aedui, Ally) => 8,
        (Aedui, Citadel) => 1,
        (Belgae, Leader) => 1,
        (Belgae, Warband) => 24,
        (Belgae, Ally) => 8,
        (Belgae, Citadel) => 1,
        (Germans, Leader) if scenario.ruleset() == super::Ruleset::Ariovistus => 1,
        (Germans, Warband) => 16,
        (Germans, Ally) if scenario.ruleset() == super::Ruleset::Ariovistus => 4,
        (Germans, Settlement) if scenario.ruleset() == super::Ruleset::Ariovistus => 4,
        _ => 0,
    }
}

/// Cost per region for Roman Recruit; 0 in Cisalpina (spec §4.3.1).
pub fn roman_recruit_cost(in_cisalpina: bool) -> u32 {
    if in_cisalpina {
        0
    } else {
        2
    }
}

/// Gallic Rally cost per region for the given faction. `in_home` means the
/// region is in the faction's home list (Aedui/Belgae) or, for Arverni,
/// that the region is Devastated with Vercingetorix present.
pub fn gallic_rally_cost(faction: Faction, in_home: bool) -> u32 {
    match (faction, in_home) {
        (Faction::Aedui, true) => 1,
        (Faction::Aedui, false) => 2,
        (Faction::Arverni, true) => 1,
        (Faction::Arverni, false) => 2,
        (Faction::Belgae, true) => 1,
        (Faction::Belgae, false) => 2,
        _ => 2,
    }
}

/// Germanic Rally cost (Ariovistus player command, or base-game
/// Germans-Phase). Cheaper in Germania or at an existing Settlement.
pub fn germanic_rally_cost(in_germania: bool, has_settlement: bool) -> u32 {
    if in_germania || has_settlement {
        1
    } else {
        2
    }
}

/// March cost per region entered.
pub fn march_cost(faction: Faction, in_germania: bool) -> u32 {
    match faction {
        Faction::Romans => 1,
        Faction::Germans => {
            if in_germania {
                0
            } else {
                1
            }
        }
        _ => 1,
    }
}

pub const BUILD_FORT_COST: u32 = 2;
pub const BUILD_SUBDUE_OR_ALLY_COST: u32 = 2;
pub const ENTREAT_COST_PER_REGION: u32 = 1;
pub const SUBORN_COST_PER_ALLY: u32 = 2;
pub const SUBORN_COST_PER_WARBAND_OR_AUXILIA: u32 = 1;
pub const SUBORN_MAX_OPERATIONS: u32 = 3;
pub const SETTLE_COST: u32 = 2;
pub const SETTLE_COST_DEVASTATED: u32 = 4;
pub const ARIOVISTUS_SETTLE_PIECE_CAP: u32 = 4;

/// Devastate removal fractions: numerator/denominator of Arverni's own
/// Warbands, and of every other faction's mobile forces present.
pub const DEVASTATE_ARVERNI_FRACTION: (u32, u32) = (1, 4);
pub const DEVASTATE_OTHER_FRACTION: (u32, u32) = (1, 3);

/// Seize Forage income per Subdued tribe and per Dispersed tribe.
pub const FORAGE_PER_SUBDUED: u32 = 1;
pub const FORAGE_PER_DISPERSED: u32 = 1;

/// Quarters per-region cost, scaled by Devastated and reduced by free
/// pieces from Allies/Forts.
pub const QUARTERS_COST_WITH_ALLY: u32 = 1;
pub const QUARTERS_COST_WITHOUT_ALLY: u32 = 2;
pub const QUARTERS_DEVASTATED_MULTIPLIER: u32 = 2;
pub const QUARTERS_FREE_PIECES_PER_ALLY: u32 = 2;
pub const QUARTERS_FREE_PIECES_PER_FORT: u32 = 2;

/// Harvest income per Ally/Citadel, plus Aedui's fixed river-toll bonus.
pub const HARVEST_PER_ALLY_OR_CITADEL: u32 = 1;
pub const AEDUI_RIVER_TOLLS: u32 = 1;

/// Victory thresholds (spec §4.9).
pub const ROMAN_VICTORY_THRESHOLD: u32 = 13;
pub const ARVERNI_OFFMAP_LEGIONS_THRESHOLD: u32 = 6;
pub const ARVERNI_ALLIES_CITADELS_THRESHOLD: u32 = 10;
pub const BELGIC_VICTORY_THRESHOLD: u32 = 18;
pub const GERMANIC_VICTORY_THRESHOLD: u32 = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legion_track_matches_legion_cap() {
        assert_eq!(LEGIONS_PER_ROW * 3, cap(Scenario::GreatRevolt, Faction::Romans, PieceKind::Legion));
    }

    #[test]
    fn germans_have_no_leader_in_base_game() {
        assert_eq!(cap(Scenario::GreatRevolt, Faction::Germans, PieceKind::Leader), 0);
        assert_eq!(cap(Scenario::Ariovistus, Faction::Germans, PieceKind::Leader), 1);
    }

    #[test]
    fn cisalpina_recruit_is_free() {
        assert_eq!(roman_recruit_cost(true), 0);
        assert_eq!(roman_recruit_cost(false), 2);
    }
}
