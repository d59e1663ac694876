use settlement_impact::simulator::{
    calculate_impact, validate_top_level, AllocationPlan, AllocationWarning, Category,
    PaymentType, ReferenceCatalog, SettlementSimulator, SimulationRequest,
    RECURRING_IMPACT_RATIO,
};
use std::sync::Arc;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn simulator() -> SettlementSimulator {
    SettlementSimulator::new(Arc::new(ReferenceCatalog::standard()))
}

fn plan_with(catalog: &ReferenceCatalog, choices: &[(Category, i64, &str)]) -> AllocationPlan {
    let mut plan = AllocationPlan::default();
    for (category, pct, profile) in choices {
        plan.allocate(*category, *pct).expect("valid pct");
        let profile = catalog
            .find_profile(*category, profile)
            .expect("profile in catalog")
            .cloned();
        plan.choose_profile(*category, profile);
    }
    plan
}

#[test]
fn top_level_split_always_sums_to_one_hundred() {
    for per_capita in 0..=100 {
        for priority in 0..=(100 - per_capita) {
            let allocation = validate_top_level(per_capita, priority).expect("valid split");
            assert_eq!(
                u32::from(allocation.per_capita_pct)
                    + u32::from(allocation.priority_areas_pct)
                    + u32::from(allocation.savings_pct),
                100
            );
        }
    }
}

#[test]
fn nation_a_build_schools_scenario() {
    let mut request = SimulationRequest::new("Nation A");
    request.category_pct.insert("Education".to_string(), 50);
    request
        .profiles
        .insert("Education".to_string(), Some("Build Schools".to_string()));

    let outcome = simulator().run(&request).expect("simulation runs");

    assert_close(outcome.impact.category_impact(Category::Education), 750_000.0);
    assert_close(outcome.impact.one_time_impact, 750_000.0);
    assert_close(outcome.impact.recurring_impact, 37_500.0);
    assert!(outcome.warnings.is_empty());

    let investment = outcome
        .success_factors
        .score("Investment Facilitation")
        .expect("factor present");
    assert_close(investment, 0.6 + 0.75);
}

#[test]
fn nation_b_infrastructure_and_health_scenario() {
    let catalog = ReferenceCatalog::standard();
    let nation = catalog.get_nation("Nation B").expect("nation present");
    let plan = plan_with(
        &catalog,
        &[
            (Category::Infrastructure, 40, "Roads & Utilities"),
            (Category::Health, 30, "Clinics & Hospitals"),
        ],
    );

    let impact = calculate_impact(&plan, nation.settlement_amount);

    assert_close(impact.category_impact(Category::Infrastructure), 4_400_000.0);
    assert_close(impact.category_impact(Category::Health), 2_400_000.0);
    assert_close(impact.one_time_impact, 6_800_000.0);
    assert_eq!(
        impact.recurring_impact,
        impact.one_time_impact * RECURRING_IMPACT_RATIO
    );
}

#[test]
fn over_allocation_warns_and_still_computes() {
    let mut request = SimulationRequest::new("Nation B");
    for (category, pct, profile) in [
        ("Education", 50, "Scholarships"),
        ("Housing", 40, "Affordable Housing"),
        ("Infrastructure", 30, "Public Infrastructure"),
    ] {
        request.category_pct.insert(category.to_string(), pct);
        request
            .profiles
            .insert(category.to_string(), Some(profile.to_string()));
    }

    let outcome = simulator().run(&request).expect("over-allocation is not fatal");

    assert_eq!(outcome.category_check.total_pct, 120);
    assert!(outcome.category_check.exceeds);
    assert_eq!(
        outcome.warnings,
        vec![AllocationWarning::OverAllocation { total_pct: 120 }]
    );
    // 0.5*5M*1.2 + 0.4*5M*1.4 + 0.3*5M*1.9
    assert_close(outcome.impact.one_time_impact, 8_650_000.0);
}

#[test]
fn unchosen_profiles_never_contribute() {
    let mut plan = AllocationPlan::default();
    for category in Category::ordered() {
        plan.allocate(category, 20).expect("valid pct");
    }

    let impact = calculate_impact(&plan, 5_000_000.0);
    assert_eq!(impact.one_time_impact, 0.0);
    assert!(impact.per_category.iter().all(|entry| entry.impact == 0.0));
}

#[test]
fn doubling_settlement_doubles_impact() {
    let catalog = ReferenceCatalog::standard();
    let plan = plan_with(
        &catalog,
        &[
            (Category::Housing, 15, "Community Development"),
            (Category::LandPurchaseAndDevelopment, 25, "Agricultural Land"),
        ],
    );

    let base = calculate_impact(&plan, 1_000_000.0);
    let doubled = calculate_impact(&plan, 2_000_000.0);
    assert_eq!(doubled.one_time_impact, base.one_time_impact * 2.0);
    assert_eq!(doubled.recurring_impact, base.recurring_impact * 2.0);
}

#[test]
fn installments_spread_per_member_payments() {
    let mut request = SimulationRequest::new("Nation B");
    request.per_capita_pct = 40;
    request.priority_areas_pct = 60;
    request.payment_type = PaymentType::Installments;
    request.installment_years = Some(10);

    let outcome = simulator().run(&request).expect("simulation runs");

    assert_eq!(outcome.allocation.savings_pct, 0);
    assert_close(outcome.per_capita.pool, 2_000_000.0);
    assert_close(outcome.per_capita.per_member, 400.0);
    assert_close(outcome.per_capita.per_member_per_year, 40.0);
}

#[test]
fn zero_settlement_leaves_success_factors_unchanged() {
    let catalog = ReferenceCatalog::standard();
    let mut nation = catalog.get_nation("Nation A").expect("nation present").clone();
    nation.settlement_amount = 0.0;
    let plan = plan_with(&catalog, &[(Category::Education, 50, "Build Schools")]);

    let outcome = simulator().simulate(&nation, &plan);

    assert_eq!(outcome.impact.one_time_impact, 0.0);
    assert!(outcome.success_factors.impact_ratio.is_none());
    assert_eq!(
        outcome.success_factors.updated_scores(),
        nation.initial_success_factors
    );
}

#[test]
fn invalid_installment_years_are_rejected() {
    let mut request = SimulationRequest::new("Nation A");
    request.payment_type = PaymentType::Installments;
    request.installment_years = Some(25);

    let err = simulator().run(&request).expect_err("years out of range");
    assert!(err.to_string().contains("installment years"));
}
