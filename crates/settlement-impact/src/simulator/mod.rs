//! Settlement allocation and impact engine.
//!
//! Every operation is a pure, synchronous computation over the reference
//! catalog and the caller's allocation plan. Nothing is cached between calls.

pub mod allocation;
pub mod catalog;
pub mod domain;
pub mod impact;
pub mod reassessment;
pub mod report;
pub mod router;
mod session;

pub use allocation::{
    validate_category_allocation, validate_top_level, AllocationBreakdown, AllocationError,
    AllocationPlan, AllocationWarning, CategoryAllocationCheck, PerCapitaBreakdown,
    TopLevelAllocation,
};
pub use catalog::{CatalogError, CategoryProfiles, ReferenceCatalog};
pub use domain::{
    Category, ExpenditureProfile, Location, NationProfile, PaymentSchedule, PaymentType,
    RECURRING_IMPACT_RATIO,
};
pub use impact::{calculate_impact, CategoryImpact, ImpactResult};
pub use reassessment::{
    reassess, FactorAssessment, FactorWeights, ReassessmentError, SuccessFactorState,
};
pub use router::simulation_router;
pub use session::{SettlementSimulator, SimulationError, SimulationOutcome, SimulationRequest};
