use super::domain::{Category, ExpenditureProfile, Location, NationProfile};
use super::reassessment::FactorWeights;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Sentinel label presentation layers show for "no profile chosen".
pub const NO_PROFILE_LABEL: &str = "None";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown nation '{0}'")]
    UnknownNation(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown expenditure profile '{profile}' for {category}")]
    UnknownProfile { category: Category, profile: String },
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownNation(_) | Self::UnknownCategory(_) | Self::UnknownProfile { .. }
        )
    }
}

/// A priority area with its reassessment weight and program options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfiles {
    pub category: Category,
    pub weight: f64,
    pub profiles: Vec<ExpenditureProfile>,
}

impl CategoryProfiles {
    /// Selectable options, led by the empty choice.
    pub fn options(&self) -> Vec<Option<&ExpenditureProfile>> {
        std::iter::once(None)
            .chain(self.profiles.iter().map(Some))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    nations: Vec<NationProfile>,
    categories: Vec<CategoryProfiles>,
}

/// Immutable lookup tables loaded once per process.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceCatalog {
    nations: Vec<NationProfile>,
    categories: Vec<CategoryProfiles>,
}

impl ReferenceCatalog {
    /// The two-nation reference instance used by the learning game.
    pub fn standard() -> Self {
        Self {
            nations: standard_nations(),
            categories: standard_categories(),
        }
    }

    pub fn from_parts(
        nations: Vec<NationProfile>,
        categories: Vec<CategoryProfiles>,
    ) -> Result<Self, CatalogError> {
        validate_nations(&nations)?;
        let categories = order_categories(categories)?;
        Ok(Self {
            nations,
            categories,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_parts(document.nations, document.categories)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            nations = catalog.nations.len(),
            "loaded reference catalog"
        );
        Ok(catalog)
    }

    pub fn list_nations(&self) -> &[NationProfile] {
        &self.nations
    }

    pub fn get_nation(&self, name: &str) -> Result<&NationProfile, CatalogError> {
        self.nations
            .iter()
            .find(|nation| nation.name == name)
            .ok_or_else(|| CatalogError::UnknownNation(name.to_string()))
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.categories.iter().map(|entry| entry.category).collect()
    }

    pub fn category_entries(&self) -> &[CategoryProfiles] {
        &self.categories
    }

    pub fn category_by_name(&self, name: &str) -> Result<Category, CatalogError> {
        Category::from_name(name).ok_or_else(|| CatalogError::UnknownCategory(name.to_string()))
    }

    pub fn get_category_weight(&self, category: Category) -> Result<f64, CatalogError> {
        self.entry(category).map(|entry| entry.weight)
    }

    pub fn list_profiles(&self, category: Category) -> Result<&[ExpenditureProfile], CatalogError> {
        self.entry(category).map(|entry| entry.profiles.as_slice())
    }

    /// Selectable options for a category, led by the empty choice.
    pub fn profile_options(
        &self,
        category: Category,
    ) -> Result<Vec<Option<&ExpenditureProfile>>, CatalogError> {
        self.entry(category).map(CategoryProfiles::options)
    }

    /// Resolves a profile by display name. Blank or "None" means no profile.
    pub fn find_profile(
        &self,
        category: Category,
        name: &str,
    ) -> Result<Option<&ExpenditureProfile>, CatalogError> {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(NO_PROFILE_LABEL) {
            return Ok(None);
        }

        self.list_profiles(category)?
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
            .map(Some)
            .ok_or_else(|| CatalogError::UnknownProfile {
                category,
                profile: name.to_string(),
            })
    }

    /// Success-factor weights keyed by category label.
    pub fn factor_weights(&self) -> FactorWeights {
        self.categories
            .iter()
            .map(|entry| (entry.category.label().to_string(), entry.weight))
            .collect()
    }

    fn entry(&self, category: Category) -> Result<&CategoryProfiles, CatalogError> {
        self.categories
            .iter()
            .find(|entry| entry.category == category)
            .ok_or_else(|| CatalogError::UnknownCategory(category.label().to_string()))
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_nations(nations: &[NationProfile]) -> Result<(), CatalogError> {
    if nations.is_empty() {
        return Err(invalid("at least one nation profile is required"));
    }

    let mut seen = BTreeSet::new();
    for nation in nations {
        if !seen.insert(nation.name.as_str()) {
            return Err(invalid(format!("duplicate nation '{}'", nation.name)));
        }
        if nation.population == 0 {
            return Err(invalid(format!(
                "nation '{}' must have a positive population",
                nation.name
            )));
        }
        if !(nation.settlement_amount.is_finite() && nation.settlement_amount > 0.0) {
            return Err(invalid(format!(
                "nation '{}' must have a positive settlement amount",
                nation.name
            )));
        }
        if let Some((factor, score)) = nation
            .initial_success_factors
            .iter()
            .find(|(_, score)| !(0.0..=1.0).contains(*score))
        {
            return Err(invalid(format!(
                "success factor '{factor}' of '{}' is {score}, expected 0..=1",
                nation.name
            )));
        }
    }
    Ok(())
}

fn order_categories(
    categories: Vec<CategoryProfiles>,
) -> Result<Vec<CategoryProfiles>, CatalogError> {
    let mut by_category = BTreeMap::new();
    for entry in categories {
        validate_category(&entry)?;
        let category = entry.category;
        if by_category.insert(category, entry).is_some() {
            return Err(invalid(format!("duplicate category '{category}'")));
        }
    }

    if let Some(missing) = Category::ordered()
        .into_iter()
        .find(|category| !by_category.contains_key(category))
    {
        return Err(invalid(format!("category '{missing}' is missing")));
    }

    Ok(by_category.into_values().collect())
}

fn validate_category(entry: &CategoryProfiles) -> Result<(), CatalogError> {
    if !(entry.weight.is_finite() && entry.weight > 0.0) {
        return Err(invalid(format!(
            "category '{}' must have a positive weight",
            entry.category
        )));
    }

    let mut names = BTreeSet::new();
    for profile in &entry.profiles {
        if profile.name.trim().eq_ignore_ascii_case(NO_PROFILE_LABEL) {
            return Err(invalid(format!(
                "'{NO_PROFILE_LABEL}' is reserved and cannot name a profile in '{}'",
                entry.category
            )));
        }
        if !names.insert(profile.name.to_ascii_lowercase()) {
            return Err(invalid(format!(
                "duplicate profile '{}' in '{}'",
                profile.name, entry.category
            )));
        }
        if !(profile.impact_multiplier.is_finite() && profile.impact_multiplier > 0.0) {
            return Err(invalid(format!(
                "profile '{}' in '{}' must have a positive multiplier",
                profile.name, entry.category
            )));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> CatalogError {
    CatalogError::InvalidCatalog(message.into())
}

fn standard_nations() -> Vec<NationProfile> {
    vec![
        NationProfile {
            name: "Nation A".to_string(),
            location: Location::Rural,
            population: 1_500,
            settlement_amount: 1_000_000.0,
            initial_success_factors: BTreeMap::from([
                ("Investment Facilitation".to_string(), 0.6),
                ("Economic Opportunity Realization".to_string(), 0.5),
            ]),
        },
        NationProfile {
            name: "Nation B".to_string(),
            location: Location::Urban,
            population: 5_000,
            settlement_amount: 5_000_000.0,
            initial_success_factors: BTreeMap::from([
                ("Investment Facilitation".to_string(), 0.8),
                ("Economic Opportunity Realization".to_string(), 0.7),
            ]),
        },
    ]
}

fn standard_categories() -> Vec<CategoryProfiles> {
    vec![
        CategoryProfiles {
            category: Category::Education,
            weight: 1.5,
            profiles: vec![
                ExpenditureProfile::new("Build Schools", 1.5),
                ExpenditureProfile::new("Scholarships", 1.2),
            ],
        },
        CategoryProfiles {
            category: Category::Health,
            weight: 1.2,
            profiles: vec![
                ExpenditureProfile::new("Clinics & Hospitals", 1.6),
                ExpenditureProfile::new("Health Programs", 1.3),
            ],
        },
        CategoryProfiles {
            category: Category::Housing,
            weight: 1.1,
            profiles: vec![
                ExpenditureProfile::new("Affordable Housing", 1.4),
                ExpenditureProfile::new("Community Development", 1.2),
            ],
        },
        CategoryProfiles {
            category: Category::LandPurchaseAndDevelopment,
            weight: 1.8,
            profiles: vec![
                ExpenditureProfile::new("Agricultural Land", 2.0),
                ExpenditureProfile::new("Commercial Land", 1.7),
            ],
        },
        CategoryProfiles {
            category: Category::Infrastructure,
            weight: 2.0,
            profiles: vec![
                ExpenditureProfile::new("Roads & Utilities", 2.2),
                ExpenditureProfile::new("Public Infrastructure", 1.9),
            ],
        },
    ]
}
