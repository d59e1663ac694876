use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Share of the one-time impact assumed to recur every year.
pub const RECURRING_IMPACT_RATIO: f64 = 0.05;

/// Weight applied to a success factor with no entry in the weight table.
pub const DEFAULT_FACTOR_WEIGHT: f64 = 1.0;

pub const MIN_INSTALLMENT_YEARS: u8 = 1;
pub const MAX_INSTALLMENT_YEARS: u8 = 20;
pub const DEFAULT_INSTALLMENT_YEARS: u8 = 5;

pub const DEFAULT_PER_CAPITA_PCT: u8 = 30;
pub const DEFAULT_PRIORITY_AREAS_PCT: u8 = 50;

/// Priority areas a settlement can be invested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Education,
    Health,
    Housing,
    LandPurchaseAndDevelopment,
    Infrastructure,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Education,
            Self::Health,
            Self::Housing,
            Self::LandPurchaseAndDevelopment,
            Self::Infrastructure,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Housing => "Housing",
            Self::LandPurchaseAndDevelopment => "Land Purchase & Development",
            Self::Infrastructure => "Infrastructure",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Health => "health",
            Self::Housing => "housing",
            Self::LandPurchaseAndDevelopment => "land_purchase_and_development",
            Self::Infrastructure => "infrastructure",
        }
    }

    /// Resolves either the display label or the snake_case key, ignoring case.
    pub fn from_name(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ordered().into_iter().find(|category| {
            category.label().eq_ignore_ascii_case(needle)
                || category.key().eq_ignore_ascii_case(needle)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Rural,
    Urban,
}

impl Location {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rural => "Rural",
            Self::Urban => "Urban",
        }
    }
}

/// Hypothetical community receiving a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationProfile {
    pub name: String,
    pub location: Location,
    pub population: u32,
    pub settlement_amount: f64,
    pub initial_success_factors: BTreeMap<String, f64>,
}

/// Program option within a category and the multiplier it applies to spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureProfile {
    pub name: String,
    pub impact_multiplier: f64,
}

impl ExpenditureProfile {
    pub fn new(name: impl Into<String>, impact_multiplier: f64) -> Self {
        Self {
            name: name.into(),
            impact_multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    LumpSum,
    Installments,
}

impl PaymentType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LumpSum => "Lump Sum Payment",
            Self::Installments => "Smaller Payments Over Time",
        }
    }
}

/// How the per capita pool reaches members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentSchedule {
    #[default]
    LumpSum,
    Installments {
        years: u8,
    },
}

impl PaymentSchedule {
    pub const fn payment_type(self) -> PaymentType {
        match self {
            Self::LumpSum => PaymentType::LumpSum,
            Self::Installments { .. } => PaymentType::Installments,
        }
    }

    /// Number of yearly payments; a lump sum is a single payment.
    pub const fn years(self) -> u8 {
        match self {
            Self::LumpSum => 1,
            Self::Installments { years } => years,
        }
    }

    pub const fn label(self) -> &'static str {
        self.payment_type().label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lookup_accepts_labels_and_keys() {
        assert_eq!(
            Category::from_name("Land Purchase & Development"),
            Some(Category::LandPurchaseAndDevelopment)
        );
        assert_eq!(
            Category::from_name("land_purchase_and_development"),
            Some(Category::LandPurchaseAndDevelopment)
        );
        assert_eq!(Category::from_name(" health "), Some(Category::Health));
        assert_eq!(Category::from_name("Transit"), None);
    }

    #[test]
    fn payment_schedule_counts_years() {
        assert_eq!(PaymentSchedule::LumpSum.years(), 1);
        assert_eq!(PaymentSchedule::Installments { years: 7 }.years(), 7);
        assert_eq!(
            PaymentSchedule::Installments { years: 7 }.label(),
            "Smaller Payments Over Time"
        );
    }

    #[test]
    fn payment_schedule_serializes_with_tag() {
        let value = serde_json::to_value(PaymentSchedule::Installments { years: 3 })
            .expect("schedule serializes");
        assert_eq!(value["type"], "installments");
        assert_eq!(value["years"], 3);
    }
}
