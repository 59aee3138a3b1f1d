//! Region and macro-region identifiers.
//!
//! The remote service shards its data across a fixed set of platform regions,
//! each aggregated into one of four macro-regions for cross-region endpoints.
//! Every value here is known at compile time; the throttle registry keys its
//! limiters by [`Location`].

use std::fmt;
use std::str::FromStr;

use crate::error::FloodgateError;

/// A platform region served by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Br,
    Eune,
    Euw,
    Jp,
    Kr,
    Lan,
    Las,
    Na,
    Oce,
    Pbe,
    Ph,
    Ru,
    Sg,
    Th,
    Tr,
    Tw,
    Vn,
}

impl Region {
    /// Every platform region.
    pub const ALL: [Region; 17] = [
        Region::Br,
        Region::Eune,
        Region::Euw,
        Region::Jp,
        Region::Kr,
        Region::Lan,
        Region::Las,
        Region::Na,
        Region::Oce,
        Region::Pbe,
        Region::Ph,
        Region::Ru,
        Region::Sg,
        Region::Th,
        Region::Tr,
        Region::Tw,
        Region::Vn,
    ];

    /// The identifier used in hostnames and routing.
    pub fn id(&self) -> &'static str {
        match self {
            Region::Br => "br1",
            Region::Eune => "eun1",
            Region::Euw => "euw1",
            Region::Jp => "jp1",
            Region::Kr => "kr",
            Region::Lan => "la1",
            Region::Las => "la2",
            Region::Na => "na1",
            Region::Oce => "oc1",
            Region::Pbe => "pbe1",
            Region::Ph => "ph2",
            Region::Ru => "ru",
            Region::Sg => "sg2",
            Region::Th => "th2",
            Region::Tr => "tr1",
            Region::Tw => "tw2",
            Region::Vn => "vn2",
        }
    }

    /// The macro-region aggregating this region's data.
    pub fn group(&self) -> MacroRegion {
        match self {
            Region::Br | Region::Lan | Region::Las | Region::Na | Region::Pbe => {
                MacroRegion::Americas
            }
            Region::Jp | Region::Kr => MacroRegion::Asia,
            Region::Eune | Region::Euw | Region::Ru | Region::Tr => MacroRegion::Europe,
            Region::Oce | Region::Ph | Region::Sg | Region::Th | Region::Tw | Region::Vn => {
                MacroRegion::Sea
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Region {
    type Err = FloodgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| FloodgateError::UnknownRegion(s.to_string()))
    }
}

/// A macro-region aggregating several platform regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroRegion {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl MacroRegion {
    /// Every macro-region.
    pub const ALL: [MacroRegion; 4] = [
        MacroRegion::Americas,
        MacroRegion::Asia,
        MacroRegion::Europe,
        MacroRegion::Sea,
    ];

    /// The identifier used in hostnames and routing.
    pub fn id(&self) -> &'static str {
        match self {
            MacroRegion::Americas => "americas",
            MacroRegion::Asia => "asia",
            MacroRegion::Europe => "europe",
            MacroRegion::Sea => "sea",
        }
    }
}

impl fmt::Display for MacroRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for MacroRegion {
    type Err = FloodgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| FloodgateError::UnknownRegion(s.to_string()))
    }
}

/// A routing target: either a platform region or a macro-region.
///
/// This is the unit of independent rate-limit state; the registry holds one
/// limiter per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// A platform region
    Region(Region),
    /// A macro-region
    Group(MacroRegion),
}

impl Location {
    /// Every known location, regions first.
    pub fn all() -> impl Iterator<Item = Location> {
        Region::ALL
            .iter()
            .copied()
            .map(Location::Region)
            .chain(MacroRegion::ALL.iter().copied().map(Location::Group))
    }

    /// The identifier used in hostnames and routing.
    pub fn id(&self) -> &'static str {
        match self {
            Location::Region(region) => region.id(),
            Location::Group(group) => group.id(),
        }
    }
}

impl From<Region> for Location {
    fn from(region: Region) -> Self {
        Location::Region(region)
    }
}

impl From<MacroRegion> for Location {
    fn from(group: MacroRegion) -> Self {
        Location::Group(group)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Location {
    type Err = FloodgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Region>()
            .map(Location::Region)
            .or_else(|_| s.parse::<MacroRegion>().map(Location::Group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_region_has_a_group() {
        assert_eq!(Region::Na.group(), MacroRegion::Americas);
        assert_eq!(Region::Eune.group(), MacroRegion::Europe);
        assert_eq!(Region::Kr.group(), MacroRegion::Asia);
        assert_eq!(Region::Oce.group(), MacroRegion::Sea);
        assert_eq!(Region::Pbe.group(), MacroRegion::Americas);
    }

    #[test]
    fn test_region_ids_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.id().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_parsing_ignores_case() {
        assert_eq!("EUN1".parse::<Region>().unwrap(), Region::Eune);
        assert_eq!("Americas".parse::<MacroRegion>().unwrap(), MacroRegion::Americas);
    }

    #[test]
    fn test_unknown_identifier_is_rejected() {
        let err = "atlantis".parse::<Location>().unwrap_err();
        assert!(matches!(err, FloodgateError::UnknownRegion(_)));
    }

    #[test]
    fn test_location_parses_both_kinds() {
        assert_eq!("kr".parse::<Location>().unwrap(), Location::Region(Region::Kr));
        assert_eq!(
            "europe".parse::<Location>().unwrap(),
            Location::Group(MacroRegion::Europe)
        );
    }

    #[test]
    fn test_all_locations_are_enumerated() {
        assert_eq!(Location::all().count(), Region::ALL.len() + MacroRegion::ALL.len());
    }
}
