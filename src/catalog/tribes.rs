//! Tribe identifiers, their home region, and the City overlay. Grounded on
//! the `TRIBE_*` constant list and `TRIBE_TO_CITY` mapping in
//! `fs_bot/map/map_data.py`.

use super::Region;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tribe {
    Menapii,
    Morini,
    Eburones,
    Nervii,
    Bellovaci,
    Atrebates,
    Remi,
    SuebiNorth,
    Sugambri,
    SuebiSouth,
    Ubii,
    Treveri,
    Carnutes,
    Aulerci,
    Mandubii,
    Senones,
    Lingones,
    Veneti,
    Namnetes,
    Pictones,
    Santones,
    Bituriges,
    Aedui,
    Sequani,
    Helvetii,
    Arverni,
    Cadurci,
    Volcae,
    Catuvellauni,
    Helvii,
    Nori,
}

impl Tribe {
    pub const ALL: [Tribe; 31] = [
        Tribe::Menapii,
        Tribe::Morini,
        Tribe::Eburones,
        Tribe::Nervii,
        Tribe::Bellovaci,
        Tribe::Atrebates,
        Tribe::Remi,
        Tribe::SuebiNorth,
        Tribe::Sugambri,
        Tribe::SuebiSouth,
        Tribe::Ubii,
        Tribe::Treveri,
        Tribe::Carnutes,
        Tribe::Aulerci,
        Tribe::Mandubii,
        Tribe::Senones,
        Tribe::Lingones,
        Tribe::Veneti,
        Tribe::Namnetes,
        Tribe::Pictones,
        Tribe::Santones,
        Tribe::Bituriges,
        Tribe::Aedui,
        Tribe::Sequani,
        Tribe::Helvetii,
        Tribe::Arverni,
        Tribe::Cadurci,
        Tribe::Volcae,
        Tribe::Catuvellauni,
        Tribe::Helvii,
        Tribe::Nori,
    ];

    /// The region a tribe is pinned to. A tribe never moves, matching the
    /// "tribes refer to their region, neither owns the other" design note.
    pub fn home_region(&self) -> Region {
        match self {
            Tribe::Menapii | Tribe::Morini => Region::Morini,
            Tribe::Eburones | Tribe::Nervii | Tribe::Bellovaci => Region::Nervii,
            Tribe::Atrebates | Tribe::Remi => Region::Atrebates,
            Tribe::SuebiNorth | Tribe::Sugambri => Region::Sugambri,
            Tribe::SuebiSouth | Tribe::Ubii => Region::Ubii,
            Tribe::Treveri => Region::Treveri,
            Tribe::Carnutes | Tribe::Aulerci => Region::Carnutes,
            Tribe::Mandubii | Tribe::Senones | Tribe::Lingones => Region::Mandubii,
            Tribe::Veneti | Tribe::Namnetes => Region::Veneti,
            Tribe::Pictones | Tribe::Santones => Region::Pictones,
            Tribe::Bituriges => Region::Bituriges,
            Tribe::Aedui => Region::Aedui,
            Tribe::Sequani | Tribe::Helvetii => Region::Sequani,
            Tribe::Arverni | Tribe::Cadurci | Tribe::Volcae => Region::Arverni,
            Tribe::Catuvellauni => Region::Britannia,
            Tribe::Helvii | Tribe::Nori => Region::Provincia,
        }
    }

    /// Which City sits in this tribe's region, if any.
    pub fn city(&self) -> Option<City> {
        City::ALL.into_iter().find(|city| city.tribe() == *self)
    }

    pub fn is_city(&self) -> bool {
        self.city().is_some()
    }
}

/// The six named cities, each pinned to one tribe's region (spec §3
/// "City tribes"). Grounded on `TRIBE_TO_CITY` in `fs_bot/map/map_data.py`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum City {
    Gergovia,
    Bibracte,
    Avaricum,
    Alesia,
    Cenabum,
    Vesontio,
}

impl City {
    pub const ALL: [City; 6] = [
        City::Gergovia,
        City::Bibracte,
        City::Avaricum,
        City::Alesia,
        City::Cenabum,
        City::Vesontio,
    ];

    pub fn tribe(&self) -> Tribe {
        match self {
            City::Gergovia => Tribe::Arverni,
            City::Bibracte => Tribe::Aedui,
            City::Avaricum => Tribe::Bituriges,
            City::Alesia => Tribe::Mandubii,
            City::Cenabum => Tribe::Carnutes,
            City::Vesontio => Tribe::Sequani,
        }
    }

    pub fn region(&self) -> Region {
        self.tribe().home_region()
    }
}

/// A tribe's current allegiance status (spec §3 "Tribe record").
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum TribeStatus {
    Allied,
    Subdued,
    Dispersed,
    DispersedGathering,
    Razed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tribe_has_exactly_one_home_region() {
        for tribe in Tribe::ALL {
            let _ = tribe.home_region();
        }
    }

    #[test]
    fn city_tribes_round_trip() {
        assert_eq!(City::Bibracte.tribe(), Tribe::Aedui);
        assert_eq!(Tribe::Aedui.city(), Some(City::Bibracte));
        assert!(!Tribe::Helvetii.is_city());
    }

    #[test]
    fn catuvellauni_is_in_britannia() {
        assert_eq!(Tribe::Catuvellauni.home_region(), Region::Britannia);
    }
}
