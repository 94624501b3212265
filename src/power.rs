//! Faction identifiers and the base-game / Ariovistus player-seat split.

use serde::{Deserialize, Serialize};

/// The five factions that can ever own pieces or resources.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Faction {
    Romans,
    Arverni,
    Aedui,
    Belgae,
    Germans,
}

impl Faction {
    /// Canonical iteration order used everywhere collections must not leak
    /// hash-map ordering into observable behavior (spec §5).
    pub const ALL: [Faction; 5] = [
        Faction::Romans,
        Faction::Arverni,
        Faction::Aedui,
        Faction::Belgae,
        Faction::Germans,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Faction::Romans => "Romans",
            Faction::Arverni => "Arverni",
            Faction::Aedui => "Aedui",
            Faction::Belgae => "Belgae",
            Faction::Germans => "Germans",
        }
    }

    /// True for the three non-Roman, non-Germanic Gallic factions.
    pub fn is_gallic(&self) -> bool {
        matches!(self, Faction::Arverni | Faction::Aedui | Faction::Belgae)
    }
}

/// Which factions hold a seat in the Sequence of Play for a given scenario
/// family; the excluded faction is run by a Non-player Procedure instead
/// (spec §4.6).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum SeatSet {
    /// Romans, Arverni, Aedui, Belgae play; Germans are non-player.
    Base,
    /// Romans, Germans, Aedui, Belgae play; Arverni are non-player.
    Ariovistus,
}

impl SeatSet {
    pub fn seated(&self) -> [Faction; 4] {
        match self {
            SeatSet::Base => [Faction::Romans, Faction::Arverni, Faction::Aedui, Faction::Belgae],
            SeatSet::Ariovistus => [Faction::Romans, Faction::Germans, Faction::Aedui, Faction::Belgae],
        }
    }

    pub fn non_player(&self) -> Faction {
        match self {
            SeatSet::Base => Faction::Germans,
            SeatSet::Ariovistus => Faction::Arverni,
        }
    }

    pub fn is_seated(&self, faction: Faction) -> bool {
        self.seated().contains(&faction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_seat_set_excludes_germans() {
        let seats = SeatSet::Base;
        assert!(!seats.is_seated(Faction::Germans));
        assert_eq!(seats.non_player(), Faction::Germans);
    }

    #[test]
    fn ariovistus_seat_set_excludes_arverni() {
        let seats = SeatSet::Ariovistus;
        assert!(!seats.is_seated(Faction::Arverni));
        assert_eq!(seats.non_player(), Faction::Arverni);
    }
}
