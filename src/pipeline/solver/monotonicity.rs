//! Direction of the WoE trend across final bins

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonotonicityConstraint {
    /// WoE may move freely between neighbouring bins
    None,
    /// Higher feature values carry more resignations
    Ascending,
    /// Higher feature values carry fewer resignations
    Descending,
    /// Solve both directions and keep the higher IV
    #[default]
    Auto,
}

impl MonotonicityConstraint {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
            Self::Auto => "auto",
        }
    }

    /// Whether a bin with WoE `next` may follow one with WoE `prev`.
    /// Directional trends are strict; `Auto` is resolved before solving.
    pub fn permits(self, prev: f64, next: f64) -> bool {
        match self {
            Self::Ascending => next > prev,
            Self::Descending => next < prev,
            Self::None | Self::Auto => true,
        }
    }
}

impl std::fmt::Display for MonotonicityConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MonotonicityConstraint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "free" => Ok(Self::None),
            "ascending" | "asc" | "increasing" => Ok(Self::Ascending),
            "descending" | "desc" | "decreasing" => Ok(Self::Descending),
            "auto" => Ok(Self::Auto),
            other => Err(format!(
                "unknown monotonicity '{}' (expected none, ascending, descending or auto)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("asc".parse::<MonotonicityConstraint>(), Ok(MonotonicityConstraint::Ascending));
        assert_eq!(" Decreasing ".parse::<MonotonicityConstraint>(), Ok(MonotonicityConstraint::Descending));
        assert_eq!("AUTO".parse::<MonotonicityConstraint>(), Ok(MonotonicityConstraint::Auto));
        assert!("peak".parse::<MonotonicityConstraint>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for constraint in [
            MonotonicityConstraint::None,
            MonotonicityConstraint::Ascending,
            MonotonicityConstraint::Descending,
            MonotonicityConstraint::Auto,
        ] {
            assert_eq!(constraint.to_string().parse::<MonotonicityConstraint>(), Ok(constraint));
        }
    }

    #[test]
    fn test_permits_is_strict() {
        assert!(MonotonicityConstraint::Ascending.permits(0.1, 0.2));
        assert!(!MonotonicityConstraint::Ascending.permits(0.2, 0.2));
        assert!(MonotonicityConstraint::Descending.permits(0.2, -0.5));
        assert!(MonotonicityConstraint::None.permits(0.2, -0.5));
    }
}
