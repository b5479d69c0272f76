//! Census TIGER/Line shapefile source planning
//!
//! Lists where each state's legislative district shapefiles are published
//! and where they belong locally before being merged into the combined
//! GeoJSON. Nothing is downloaded here.

use crate::app::states::{self, StateInfo};
use crate::constants::TIGER_BASE_URL;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Legislative chamber as spelled in TIGER/Line file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Lower,
    Upper,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::Lower, Chamber::Upper];

    /// Single-letter code used in file names (`l` / `u`)
    pub fn code(&self) -> char {
        match self {
            Chamber::Lower => 'l',
            Chamber::Upper => 'u',
        }
    }
}

/// One downloadable shapefile archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapefileSource {
    pub state: &'static str,
    pub fips: &'static str,
    pub chamber: Chamber,
    pub url: String,
    pub destination: PathBuf,
}

/// The states plus Puerto Rico, the jurisdictions with TIGER SLD layers
pub fn source_jurisdictions() -> Vec<&'static StateInfo> {
    let mut jurisdictions: Vec<_> = states::states().collect();
    jurisdictions.extend(states::find_by_abbr("PR"));
    jurisdictions
}

/// Download URL for one state and chamber (the Census host is case-sensitive)
pub fn shapefile_url(year: u16, fips: &str, chamber: Chamber) -> String {
    let code = chamber.code();
    format!(
        "{}/TIGER{year}/SLD{upper}/tl_{year}_{fips}_sld{code}.zip",
        TIGER_BASE_URL,
        upper = code.to_ascii_uppercase(),
    )
}

/// Local archive name for one state and chamber
pub fn shapefile_name(year: u16, fips: &str, chamber: Chamber) -> String {
    format!("tl_{}_{}_sld{}.zip", year, fips, chamber.code())
}

/// Every source archive for `year`, targeting `data_dir`
///
/// Unicameral legislatures publish no lower-chamber layer and are skipped
/// for that chamber.
pub fn plan_sources(year: u16, data_dir: &Path) -> Vec<ShapefileSource> {
    let mut sources = Vec::new();

    for state in source_jurisdictions() {
        for chamber in Chamber::ALL {
            if chamber == Chamber::Lower && state.unicameral {
                debug!("Skipping lower chamber for unicameral {}", state.name);
                continue;
            }
            sources.push(ShapefileSource {
                state: state.name,
                fips: state.fips,
                chamber,
                url: shapefile_url(year, state.fips, chamber),
                destination: data_dir.join(shapefile_name(year, state.fips, chamber)),
            });
        }
    }

    sources
}
