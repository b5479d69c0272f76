//! Built-in reference set of U.S. states and territories
//!
//! Maps two-digit FIPS codes to USPS postal abbreviations. Every `STATEFP`
//! value found in the TIGER/Line legislative district files must resolve
//! against this table.

/// Kind of jurisdiction a FIPS code names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JurisdictionKind {
    State,
    FederalDistrict,
    Territory,
}

/// One state, district, or territory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub fips: &'static str,
    pub abbr: &'static str,
    pub name: &'static str,
    pub kind: JurisdictionKind,
    /// Legislature has a single chamber (no lower-chamber districts)
    pub unicameral: bool,
}

impl StateInfo {
    const fn state(fips: &'static str, abbr: &'static str, name: &'static str) -> Self {
        Self {
            fips,
            abbr,
            name,
            kind: JurisdictionKind::State,
            unicameral: false,
        }
    }

    const fn territory(fips: &'static str, abbr: &'static str, name: &'static str) -> Self {
        Self {
            fips,
            abbr,
            name,
            kind: JurisdictionKind::Territory,
            unicameral: false,
        }
    }

    /// Postal abbreviation as written into output properties
    pub fn postal_code(&self) -> String {
        self.abbr.to_ascii_lowercase()
    }
}

/// All states, the District of Columbia, and the inhabited territories
pub static STATES_AND_TERRITORIES: &[StateInfo] = &[
    StateInfo::state("01", "AL", "Alabama"),
    StateInfo::state("02", "AK", "Alaska"),
    StateInfo::state("04", "AZ", "Arizona"),
    StateInfo::state("05", "AR", "Arkansas"),
    StateInfo::state("06", "CA", "California"),
    StateInfo::state("08", "CO", "Colorado"),
    StateInfo::state("09", "CT", "Connecticut"),
    StateInfo::state("10", "DE", "Delaware"),
    StateInfo {
        fips: "11",
        abbr: "DC",
        name: "District of Columbia",
        kind: JurisdictionKind::FederalDistrict,
        unicameral: true,
    },
    StateInfo::state("12", "FL", "Florida"),
    StateInfo::state("13", "GA", "Georgia"),
    StateInfo::state("15", "HI", "Hawaii"),
    StateInfo::state("16", "ID", "Idaho"),
    StateInfo::state("17", "IL", "Illinois"),
    StateInfo::state("18", "IN", "Indiana"),
    StateInfo::state("19", "IA", "Iowa"),
    StateInfo::state("20", "KS", "Kansas"),
    StateInfo::state("21", "KY", "Kentucky"),
    StateInfo::state("22", "LA", "Louisiana"),
    StateInfo::state("23", "ME", "Maine"),
    StateInfo::state("24", "MD", "Maryland"),
    StateInfo::state("25", "MA", "Massachusetts"),
    StateInfo::state("26", "MI", "Michigan"),
    StateInfo::state("27", "MN", "Minnesota"),
    StateInfo::state("28", "MS", "Mississippi"),
    StateInfo::state("29", "MO", "Missouri"),
    StateInfo::state("30", "MT", "Montana"),
    StateInfo {
        fips: "31",
        abbr: "NE",
        name: "Nebraska",
        kind: JurisdictionKind::State,
        unicameral: true,
    },
    StateInfo::state("32", "NV", "Nevada"),
    StateInfo::state("33", "NH", "New Hampshire"),
    StateInfo::state("34", "NJ", "New Jersey"),
    StateInfo::state("35", "NM", "New Mexico"),
    StateInfo::state("36", "NY", "New York"),
    StateInfo::state("37", "NC", "North Carolina"),
    StateInfo::state("38", "ND", "North Dakota"),
    StateInfo::state("39", "OH", "Ohio"),
    StateInfo::state("40", "OK", "Oklahoma"),
    StateInfo::state("41", "OR", "Oregon"),
    StateInfo::state("42", "PA", "Pennsylvania"),
    StateInfo::state("44", "RI", "Rhode Island"),
    StateInfo::state("45", "SC", "South Carolina"),
    StateInfo::state("46", "SD", "South Dakota"),
    StateInfo::state("47", "TN", "Tennessee"),
    StateInfo::state("48", "TX", "Texas"),
    StateInfo::state("49", "UT", "Utah"),
    StateInfo::state("50", "VT", "Vermont"),
    StateInfo::state("51", "VA", "Virginia"),
    StateInfo::state("53", "WA", "Washington"),
    StateInfo::state("54", "WV", "West Virginia"),
    StateInfo::state("55", "WI", "Wisconsin"),
    StateInfo::state("56", "WY", "Wyoming"),
    StateInfo::territory("60", "AS", "American Samoa"),
    StateInfo::territory("66", "GU", "Guam"),
    StateInfo::territory("69", "MP", "Northern Mariana Islands"),
    StateInfo::territory("72", "PR", "Puerto Rico"),
    StateInfo::territory("78", "VI", "Virgin Islands"),
];

/// Look up a jurisdiction by its two-digit FIPS code
pub fn find_by_fips(fips: &str) -> Option<&'static StateInfo> {
    STATES_AND_TERRITORIES.iter().find(|state| state.fips == fips)
}

/// Look up a jurisdiction by postal abbreviation, case-insensitively
pub fn find_by_abbr(abbr: &str) -> Option<&'static StateInfo> {
    STATES_AND_TERRITORIES
        .iter()
        .find(|state| state.abbr.eq_ignore_ascii_case(abbr))
}

/// The 50 states
pub fn states() -> impl Iterator<Item = &'static StateInfo> {
    STATES_AND_TERRITORIES
        .iter()
        .filter(|state| state.kind == JurisdictionKind::State)
}
