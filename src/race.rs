//! Distance labels offered on the poster form.
//!
//! The label is only printed; statistics always use the measured distance.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RaceDistance {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
    Custom(String),
}

impl RaceDistance {
    pub const CANONICAL: [RaceDistance; 4] = [
        RaceDistance::FiveK,
        RaceDistance::TenK,
        RaceDistance::HalfMarathon,
        RaceDistance::Marathon,
    ];

    /// Matches the canonical labels with either decimal separator and an
    /// optional `km` suffix; anything else is kept verbatim as `Custom`.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        let numeric = trimmed
            .to_lowercase()
            .trim_end_matches("km")
            .trim()
            .replace(',', ".");

        if let Ok(km) = numeric.parse::<f64>() {
            for canonical in Self::CANONICAL {
                if let Some(nominal) = canonical.kilometers() {
                    if (nominal - km).abs() < 1e-9 {
                        return canonical;
                    }
                }
            }
        }

        RaceDistance::Custom(trimmed.to_string())
    }

    pub fn kilometers(&self) -> Option<f64> {
        match self {
            RaceDistance::FiveK => Some(5.0),
            RaceDistance::TenK => Some(10.0),
            RaceDistance::HalfMarathon => Some(21.0975),
            RaceDistance::Marathon => Some(42.195),
            RaceDistance::Custom(label) => label
                .to_lowercase()
                .trim_end_matches("km")
                .trim()
                .replace(',', ".")
                .parse()
                .ok(),
        }
    }
}

impl fmt::Display for RaceDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceDistance::FiveK => write!(f, "5 km"),
            RaceDistance::TenK => write!(f, "10 km"),
            RaceDistance::HalfMarathon => write!(f, "21,0975 km"),
            RaceDistance::Marathon => write!(f, "42,195 km"),
            RaceDistance::Custom(label) => write!(f, "{label}"),
        }
    }
}
