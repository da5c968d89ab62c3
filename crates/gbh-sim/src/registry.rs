//! Static reference data: the territory catalog, its store network and the
//! presentation palette shared by every dashboard variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Partition key for every territory in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerritoryCategory {
    #[serde(rename = "DROM")]
    OverseasDepartment,
    #[serde(rename = "COM")]
    OverseasCollectivity,
    #[serde(rename = "Métropole")]
    MainlandRegion,
}

impl TerritoryCategory {
    pub const ALL: [TerritoryCategory; 3] = [
        TerritoryCategory::OverseasDepartment,
        TerritoryCategory::OverseasCollectivity,
        TerritoryCategory::MainlandRegion,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Self::OverseasDepartment => "DROM",
            Self::OverseasCollectivity => "COM",
            Self::MainlandRegion => "Métropole",
        }
    }

    pub fn parse(value: &str) -> SimResult<Self> {
        match value {
            "DROM" | "drom" | "overseas-department" => Ok(Self::OverseasDepartment),
            "COM" | "com" | "overseas-collectivity" => Ok(Self::OverseasCollectivity),
            "Métropole" | "metropole" | "mainland-region" => Ok(Self::MainlandRegion),
            other => Err(SimError::InvalidArgument(format!(
                "unknown territory category '{other}' (expected one of: DROM, COM, Métropole)"
            ))),
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::OverseasDepartment => "#FF6B6B",
            Self::OverseasCollectivity => "#FFA500",
            Self::MainlandRegion => "#00CED1",
        }
    }

    pub fn territories(self) -> impl Iterator<Item = &'static Territory> {
        TERRITORIES.iter().filter(move |t| t.category == self)
    }
}

impl fmt::Display for TerritoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Status colours used alongside the per-category colours.
pub mod palette {
    pub const SUCCESS: &str = "#00D26A";
    pub const WARNING: &str = "#FFB800";
    pub const INFO: &str = "#0095FF";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Territory {
    pub name: &'static str,
    pub category: TerritoryCategory,
    pub stores: &'static [&'static str],
}

const fn territory(
    name: &'static str,
    category: TerritoryCategory,
    stores: &'static [&'static str],
) -> Territory {
    Territory {
        name,
        category,
        stores,
    }
}

use TerritoryCategory::{MainlandRegion, OverseasCollectivity, OverseasDepartment};

pub static TERRITORIES: &[Territory] = &[
    territory(
        "Martinique",
        OverseasDepartment,
        &["GBH Fort-de-France", "GBH Lamentin", "GBH Ducos", "GBH Schoelcher"],
    ),
    territory(
        "Guadeloupe",
        OverseasDepartment,
        &["GBH Pointe-à-Pitre", "GBH Baie-Mahault", "GBH Les Abymes", "GBH Le Gosier"],
    ),
    territory(
        "Réunion",
        OverseasDepartment,
        &["GBH Saint-Denis", "GBH Saint-Pierre", "GBH Le Port", "GBH Saint-Paul"],
    ),
    territory(
        "Guyane",
        OverseasDepartment,
        &["GBH Cayenne", "GBH Kourou", "GBH Remire-Montjoly"],
    ),
    territory(
        "Mayotte",
        OverseasDepartment,
        &["GBH Mamoudzou", "GBH Dzaoudzi", "GBH Koungou"],
    ),
    territory(
        "Saint-Martin",
        OverseasCollectivity,
        &["GBH Marigot", "GBH Sandy Ground"],
    ),
    territory(
        "Saint-Barthélemy",
        OverseasCollectivity,
        &["GBH Gustavia", "GBH St Jean"],
    ),
    territory(
        "Saint-Pierre-et-Miquelon",
        OverseasCollectivity,
        &["GBH Saint-Pierre"],
    ),
    territory(
        "Wallis-et-Futuna",
        OverseasCollectivity,
        &["GBH Wallis-et-Futuna"],
    ),
    territory(
        "Polynésie française",
        OverseasCollectivity,
        &["GBH Papeete", "GBH Punaauia", "GBH Moorea"],
    ),
    territory(
        "Nouvelle-Calédonie",
        OverseasCollectivity,
        &["GBH Nouméa", "GBH Dumbéa", "GBH Mont-Dore"],
    ),
    territory(
        "Île-de-France",
        MainlandRegion,
        &[
            "GBH Paris Centre",
            "GBH Paris Nord",
            "GBH Créteil",
            "GBH Bobigny",
            "GBH Versailles",
        ],
    ),
    territory(
        "Auvergne-Rhône-Alpes",
        MainlandRegion,
        &["GBH Lyon", "GBH Grenoble", "GBH Clermont-Ferrand"],
    ),
    territory(
        "Provence-Alpes-Côte d'Azur",
        MainlandRegion,
        &["GBH Marseille", "GBH Nice", "GBH Toulon"],
    ),
    territory(
        "Nouvelle-Aquitaine",
        MainlandRegion,
        &["GBH Bordeaux", "GBH Limoges", "GBH Poitiers"],
    ),
    territory(
        "Occitanie",
        MainlandRegion,
        &["GBH Toulouse", "GBH Montpellier", "GBH Perpignan"],
    ),
    territory(
        "Hauts-de-France",
        MainlandRegion,
        &["GBH Lille", "GBH Amiens", "GBH Roubaix"],
    ),
    territory(
        "Grand Est",
        MainlandRegion,
        &["GBH Strasbourg", "GBH Reims", "GBH Nancy"],
    ),
    territory(
        "Pays de la Loire",
        MainlandRegion,
        &["GBH Nantes", "GBH Angers", "GBH Le Mans"],
    ),
    territory(
        "Bretagne",
        MainlandRegion,
        &["GBH Rennes", "GBH Brest", "GBH Lorient"],
    ),
    territory(
        "Normandie",
        MainlandRegion,
        &["GBH Rouen", "GBH Caen", "GBH Le Havre"],
    ),
    territory(
        "Bourgogne-Franche-Comté",
        MainlandRegion,
        &["GBH Dijon", "GBH Besançon"],
    ),
    territory(
        "Centre-Val de Loire",
        MainlandRegion,
        &["GBH Tours", "GBH Orléans"],
    ),
    territory("Corse", MainlandRegion, &["GBH Ajaccio", "GBH Bastia"]),
];

/// Retail departments, used as sale subcategories.
pub const DEPARTMENTS: [&str; 6] = ["Food", "DIY", "Textile", "Electronics", "Home", "Auto"];

pub fn territory_names(category: TerritoryCategory) -> Vec<&'static str> {
    category.territories().map(|t| t.name).collect()
}

pub fn find_territory(name: &str) -> SimResult<&'static Territory> {
    TERRITORIES
        .iter()
        .find(|t| t.name == name)
        .ok_or_else(|| SimError::InvalidArgument(format!("unknown territory '{name}'")))
}

pub fn stores_for(name: &str) -> SimResult<&'static [&'static str]> {
    Ok(find_territory(name)?.stores)
}

pub fn total_store_count() -> usize {
    TERRITORIES.iter().map(|t| t.stores.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_territory_has_stores_and_a_unique_name() {
        let mut names = TERRITORIES.iter().map(|t| t.name).collect::<Vec<_>>();
        assert!(TERRITORIES.iter().all(|t| !t.stores.is_empty()));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TERRITORIES.len());
    }

    #[test]
    fn category_sizes_match_catalog() {
        assert_eq!(OverseasDepartment.territories().count(), 5);
        assert_eq!(OverseasCollectivity.territories().count(), 6);
        assert_eq!(MainlandRegion.territories().count(), 13);
        assert_eq!(total_store_count(), 68);
    }

    #[test]
    fn palette_colours_are_distinct() {
        let mut colours = TerritoryCategory::ALL.map(TerritoryCategory::color).to_vec();
        colours.extend([palette::SUCCESS, palette::WARNING, palette::INFO]);
        colours.sort_unstable();
        colours.dedup();
        assert_eq!(colours.len(), 6);
        assert!(colours.iter().all(|c| c.starts_with('#') && c.len() == 7));
    }
}
