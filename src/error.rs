//! Structured error values surfaced by the calculator core.

use serde::Serialize;

/// Failure of a geometry, yield, or financial computation.
///
/// Every variant is recoverable by the user: it blocks only the transition
/// that needed the missing precondition. The [`CalcError::kind`] key is
/// stable and meant for looking up display messages.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalcError {
    /// Fewer than three outline points.
    #[error("roof outline needs at least 3 points, got {found}")]
    InsufficientVertices { found: usize },

    /// Outline encloses too little (or a non-finite) area.
    #[error("roof area {area_m2:.2} m² is below the usable minimum of {min_m2:.2} m²")]
    DegenerateArea { area_m2: f64, min_m2: f64 },

    /// No irradiance class matches the requested key or location.
    #[error("no irradiance class found for {key}")]
    UnknownIrradianceRegion { key: String },

    /// A cost or pricing assumption is out of range.
    #[error("invalid cost input `{field}`: {reason}")]
    InvalidCostInput { field: String, reason: String },

    /// A site parameter (tilt, azimuth, shading, location) is out of range.
    #[error("invalid site parameter `{field}`: {reason}")]
    InvalidSiteParameter { field: String, reason: String },
}

impl CalcError {
    /// Stable snake_case key for UI message lookup.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientVertices { .. } => "insufficient_vertices",
            Self::DegenerateArea { .. } => "degenerate_area",
            Self::UnknownIrradianceRegion { .. } => "unknown_irradiance_region",
            Self::InvalidCostInput { .. } => "invalid_cost_input",
            Self::InvalidSiteParameter { .. } => "invalid_site_parameter",
        }
    }

    pub(crate) fn cost(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidCostInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn site(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSiteParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct() {
        let errors = [
            CalcError::InsufficientVertices { found: 2 },
            CalcError::DegenerateArea {
                area_m2: 0.5,
                min_m2: 2.25,
            },
            CalcError::UnknownIrradianceRegion {
                key: "nowhere".into(),
            },
            CalcError::cost("lifetime_years", "must be > 0"),
            CalcError::site("tilt_deg", "must be within [0, 90]"),
        ];
        let mut kinds: Vec<&str> = errors.iter().map(CalcError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn display_mentions_field() {
        let e = CalcError::cost("electricity_price", "must be >= 0");
        assert_eq!(
            e.to_string(),
            "invalid cost input `electricity_price`: must be >= 0"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let e = CalcError::InsufficientVertices { found: 2 };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "insufficient_vertices");
        assert_eq!(json["found"], 2);
    }
}
