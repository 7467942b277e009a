//! Regional Material Query

use record_normalizer::{format_miles, format_psi};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Product class searched for
pub const DEFAULT_PRODUCT_CLASS: &str = "Concrete >> ReadyMix";

/// Fields requested from the material database
pub const DEFAULT_RETURN_FIELDS: &[&str] = &[
    "id",
    "concrete_compressive_strength_28d",
    "gwp",
    "plant_or_group",
];

/// Search for concrete materials produced near a postal code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuery {
    pub postal_code: u32,
    /// Plant search radius (miles)
    pub plant_distance_mi: u32,
    /// Exclusive lower strength bound (psi)
    pub strength_min_psi: u32,
    /// Exclusive upper strength bound (psi)
    pub strength_max_psi: u32,
    pub lightweight: bool,
    /// Ignored when `return_all` is set
    pub max_records: usize,
    pub return_all: bool,
    pub product_class: String,
    /// Only records with a valid, unexpired declaration
    pub only_valid: bool,
    pub return_fields: Vec<String>,
}

impl Default for MaterialQuery {
    fn default() -> Self {
        Self {
            postal_code: 0,
            plant_distance_mi: 10,
            strength_min_psi: 2000,
            strength_max_psi: 8000,
            lightweight: false,
            max_records: 500,
            return_all: false,
            product_class: DEFAULT_PRODUCT_CLASS.to_string(),
            only_valid: true,
            return_fields: DEFAULT_RETURN_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl MaterialQuery {
    /// Create a query for a postal code with default settings
    pub fn for_postal_code(postal_code: u32) -> Self {
        Self {
            postal_code,
            ..Default::default()
        }
    }

    /// Record cap, `None` when every match is requested
    pub fn record_limit(&self) -> Option<usize> {
        if self.return_all {
            None
        } else {
            Some(self.max_records)
        }
    }

    /// Plant distance as sent to the database (`"10 mi"`)
    pub fn plant_distance(&self) -> String {
        format_miles(self.plant_distance_mi)
    }

    /// Search parameter dictionary as sent to the database
    pub fn params(&self) -> Value {
        json!({
            "product_classes": { "EC3": self.product_class },
            "lightweight": self.lightweight,
            "concrete_compressive_strength_at_28d__gt": format_psi(self.strength_min_psi),
            "concrete_compressive_strength_at_28d__lt": format_psi(self.strength_max_psi),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_shape() {
        let query = MaterialQuery {
            lightweight: true,
            ..MaterialQuery::for_postal_code(10001)
        };
        let params = query.params();
        assert_eq!(params["product_classes"]["EC3"], "Concrete >> ReadyMix");
        assert_eq!(params["lightweight"], true);
        assert_eq!(params["concrete_compressive_strength_at_28d__gt"], "2000 psi");
        assert_eq!(params["concrete_compressive_strength_at_28d__lt"], "8000 psi");
        assert_eq!(query.plant_distance(), "10 mi");
    }

    #[test]
    fn test_record_limit() {
        let mut query = MaterialQuery::default();
        assert_eq!(query.record_limit(), Some(500));
        query.return_all = true;
        assert_eq!(query.record_limit(), None);
    }

    #[test]
    fn test_default_return_fields() {
        let query = MaterialQuery::default();
        assert_eq!(query.return_fields.len(), 4);
        assert!(query.only_valid);
    }
}
