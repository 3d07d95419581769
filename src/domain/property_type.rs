// src/domain/property_type.rs

/// Property types a renter can narrow a search to. The string forms are the
/// ones upstream listing feeds use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    SingleFamily,
    MultiFamily,
    Condos,
    CondoTownhome,
    Townhomes,
    DuplexTriplex,
    Farm,
    Land,
    Mobile,
}

impl PropertyType {
    pub const ALL: [PropertyType; 9] = [
        PropertyType::SingleFamily,
        PropertyType::MultiFamily,
        PropertyType::Condos,
        PropertyType::CondoTownhome,
        PropertyType::Townhomes,
        PropertyType::DuplexTriplex,
        PropertyType::Farm,
        PropertyType::Land,
        PropertyType::Mobile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single_family",
            PropertyType::MultiFamily => "multi_family",
            PropertyType::Condos => "condos",
            PropertyType::CondoTownhome => "condo_townhome",
            PropertyType::Townhomes => "townhomes",
            PropertyType::DuplexTriplex => "duplex_triplex",
            PropertyType::Farm => "farm",
            PropertyType::Land => "land",
            PropertyType::Mobile => "mobile",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "Single family",
            PropertyType::MultiFamily => "Multi family",
            PropertyType::Condos => "Condos",
            PropertyType::CondoTownhome => "Condo / townhome",
            PropertyType::Townhomes => "Townhomes",
            PropertyType::DuplexTriplex => "Duplex / triplex",
            PropertyType::Farm => "Farm",
            PropertyType::Land => "Land",
            PropertyType::Mobile => "Mobile",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}
