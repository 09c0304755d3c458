//! Role and recital-type vocabularies.
//!
//! Both are closed enumerations. Parsing accepts the enum name
//! (`LEAD_VOCAL`), an English label (`lead vocal`) or the Spanish label used
//! by the booking sheets (`voz principal`). Accents and case are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseRecitalTypeError, ParseRoleError};

/// A musical role a song may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleKind {
    /// Lead vocals.
    LeadVocal,
    /// Electric guitar.
    ElectricGuitar,
    /// Bass guitar.
    Bass,
    /// Drum kit.
    Drums,
    /// Piano / keys.
    Piano,
    /// Backing vocals.
    BackingVocal,
}

impl RoleKind {
    /// Every role, in declaration order.
    pub const ALL: [RoleKind; 6] = [
        RoleKind::LeadVocal,
        RoleKind::ElectricGuitar,
        RoleKind::Bass,
        RoleKind::Drums,
        RoleKind::Piano,
        RoleKind::BackingVocal,
    ];

    /// Stable upper-case identifier (matches the serde representation).
    pub fn code(&self) -> &'static str {
        match self {
            RoleKind::LeadVocal => "LEAD_VOCAL",
            RoleKind::ElectricGuitar => "ELECTRIC_GUITAR",
            RoleKind::Bass => "BASS",
            RoleKind::Drums => "DRUMS",
            RoleKind::Piano => "PIANO",
            RoleKind::BackingVocal => "BACKING_VOCAL",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RoleKind::LeadVocal => "lead vocal",
            RoleKind::ElectricGuitar => "electric guitar",
            RoleKind::Bass => "bass",
            RoleKind::Drums => "drums",
            RoleKind::Piano => "piano",
            RoleKind::BackingVocal => "backing vocal",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoleKind {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_label(s);
        let role = match key.as_str() {
            "lead vocal" | "lead vocals" | "voz principal" | "vocals" => RoleKind::LeadVocal,
            "electric guitar" | "guitar" | "guitarra electrica" | "guitarra" => {
                RoleKind::ElectricGuitar
            }
            "bass" | "bajo" => RoleKind::Bass,
            "drums" | "bateria" => RoleKind::Drums,
            "piano" | "keys" | "teclados" => RoleKind::Piano,
            "backing vocal" | "backing vocals" | "coros" => RoleKind::BackingVocal,
            _ => return Err(ParseRoleError(s.to_string())),
        };
        Ok(role)
    }
}

/// Genre tag of a recital, matched against a performer's preference
/// when looking for the star performer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecitalType {
    Rock,
    Pop,
    Country,
}

impl RecitalType {
    pub fn code(&self) -> &'static str {
        match self {
            RecitalType::Rock => "ROCK",
            RecitalType::Pop => "POP",
            RecitalType::Country => "COUNTRY",
        }
    }
}

impl fmt::Display for RecitalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RecitalType {
    type Err = ParseRecitalTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "rock" => Ok(RecitalType::Rock),
            "pop" => Ok(RecitalType::Pop),
            "country" => Ok(RecitalType::Country),
            _ => Err(ParseRecitalTypeError(s.to_string())),
        }
    }
}

/// Lower-cases, strips accents and maps `_`/`-` to spaces.
fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            '_' | '-' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enum_names() {
        for role in RoleKind::ALL {
            assert_eq!(role.code().parse::<RoleKind>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_human_labels() {
        assert_eq!("Voz Principal".parse::<RoleKind>().unwrap(), RoleKind::LeadVocal);
        assert_eq!("guitarra eléctrica".parse::<RoleKind>().unwrap(), RoleKind::ElectricGuitar);
        assert_eq!("batería".parse::<RoleKind>().unwrap(), RoleKind::Drums);
        assert_eq!("  coros ".parse::<RoleKind>().unwrap(), RoleKind::BackingVocal);
        assert_eq!("backing-vocal".parse::<RoleKind>().unwrap(), RoleKind::BackingVocal);
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = "theremin".parse::<RoleKind>().unwrap_err();
        assert_eq!(err.0, "theremin");
    }

    #[test]
    fn test_recital_type_parse_and_display() {
        assert_eq!("rock".parse::<RecitalType>().unwrap(), RecitalType::Rock);
        assert_eq!("POP".parse::<RecitalType>().unwrap(), RecitalType::Pop);
        assert!("jazz".parse::<RecitalType>().is_err());
        assert_eq!(RecitalType::Country.to_string(), "COUNTRY");
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&RoleKind::ElectricGuitar).unwrap();
        assert_eq!(json, "\"ELECTRIC_GUITAR\"");
        let back: RoleKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RoleKind::ElectricGuitar);
    }
}
