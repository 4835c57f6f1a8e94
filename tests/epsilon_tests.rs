//! Epsilon-constraint solve tests.
//!
//! Cases are defined as data with a known optimal value, then run
//! programmatically through the public `run` entry point.

use mo_portfolio::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-4;

fn company(name: &str, beta: f64, attrs: [f64; 5]) -> Company {
    Company {
        name: name.into(),
        beta,
        expected_return: attrs[0],
        sustainability: attrs[1],
        dividend_yield: attrs[2],
        clean_energy: attrs[3],
        pe_ratio: attrs[4],
    }
}

fn table(companies: Vec<Company>) -> CompanyTable {
    CompanyTable::new(companies).expect("valid table")
}

fn region(cap: f64, beta_tolerance: f64) -> FeasibleRegion {
    FeasibleRegion::new(cap, beta_tolerance).expect("valid region")
}

/// Four unit-beta companies with rising return and P/E.
fn ladder() -> CompanyTable {
    table(vec![
        company("A", 1.0, [0.05, 0.5, 1.0, 0.0, 10.0]),
        company("B", 1.0, [0.10, 0.5, 1.0, 0.0, 20.0]),
        company("C", 1.0, [0.15, 0.5, 1.0, 2.0, 30.0]),
        company("D", 1.0, [0.20, 0.5, 1.0, 2.0, 40.0]),
    ])
}

/// Betas on both sides of 1; only a mix reaches a portfolio beta of exactly 1.
fn mixed_betas() -> CompanyTable {
    table(vec![
        company("A", 0.8, [0.05, 0.5, 1.0, 0.0, 10.0]),
        company("B", 1.2, [0.15, 0.5, 1.0, 0.0, 10.0]),
        company("C", 0.9, [0.10, 0.5, 1.0, 0.0, 10.0]),
    ])
}

/// Bounds every portfolio of the test tables satisfies, for objectives
/// that leave P/E last.
fn loose() -> Vec<f64> {
    vec![0.0, 0.0, 0.0, 100.0]
}

/// A test case definition
struct TestCase {
    name: &'static str,
    /// Builds the table and configuration and returns the expected optimum
    build: fn() -> (CompanyTable, SolveConfig, f64),
}

fn optimal_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "identical_companies",
            build: || {
                // every feasible portfolio has return 0.1
                let t = table(vec![
                    company("A", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
                    company("B", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
                    company("C", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
                ]);
                let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
                    .with_region(region(0.5, 0.1));
                (t, config, 0.1)
            },
        },
        TestCase {
            name: "max_return_fills_top_two",
            build: || {
                // cap 0.5 on C and D: 0.5 * 0.15 + 0.5 * 0.20
                let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
                    .with_region(region(0.5, 0.1));
                (ladder(), config, 0.175)
            },
        },
        TestCase {
            name: "pe_upper_bound_binds",
            build: || {
                // return is 0.005 * P/E on this ladder, so the optimum has
                // P/E exactly 25
                let bounds = vec![0.0, 0.0, 0.0, 25.0];
                let config = SolveConfig::epsilon(Objective::ExpectedReturn, bounds)
                    .with_region(region(1.0, 0.1));
                (ladder(), config, 0.125)
            },
        },
        TestCase {
            name: "min_pe_with_clean_energy_floor",
            build: || {
                // clean energy >= 1 needs w_C + w_D >= 0.5; cheapest is
                // w_A = 0.5, w_C = 0.5
                let config = SolveConfig::epsilon(Objective::PeRatio, vec![0.0, 0.0, 0.0, 1.0])
                    .with_region(region(0.5, 0.1));
                (ladder(), config, 20.0)
            },
        },
        TestCase {
            name: "beta_band_binds",
            build: || {
                // return = 0.25 * beta - 0.15 for every company, so the
                // optimum sits on the upper beta edge 1.1
                let t = table(vec![
                    company("A", 0.8, [0.05, 0.5, 1.0, 0.0, 10.0]),
                    company("B", 1.0, [0.10, 0.5, 1.0, 0.0, 10.0]),
                    company("C", 1.2, [0.15, 0.5, 1.0, 0.0, 10.0]),
                    company("D", 1.4, [0.20, 0.5, 1.0, 0.0, 10.0]),
                ]);
                let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
                    .with_region(region(1.0, 0.1));
                (t, config, 0.125)
            },
        },
        TestCase {
            name: "zero_beta_tolerance_with_unit_betas",
            build: || {
                let config = SolveConfig::epsilon(Objective::DividendYield, loose())
                    .with_region(region(0.5, 0.0));
                (ladder(), config, 1.0)
            },
        },
        TestCase {
            name: "zero_beta_tolerance_with_mixed_betas",
            build: || {
                // beta == 1 exactly forces w_B = (1 + w_A) / 3; the cap on C
                // then gives w = (0.05, 0.35, 0.6)
                let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
                    .with_region(region(0.6, 0.0));
                (mixed_betas(), config, 0.115)
            },
        },
    ]
}

#[test]
fn test_optimal_cases() {
    let mut failures = Vec::new();

    for case in optimal_test_cases() {
        let (t, config, expected) = (case.build)();
        match run(&t, &config) {
            Ok(report) => {
                let value = report.optimized.expect("epsilon report").value;
                if (value - expected).abs() > TOL {
                    failures.push(format!("{}: expected {}, got {}", case.name, expected, value));
                }
                if !report.feasible {
                    failures.push(format!("{}: infeasible {:?}", case.name, report.violations));
                }
            }
            Err(e) => failures.push(format!("{}: error {}", case.name, e)),
        }
    }

    assert!(failures.is_empty(), "failed cases:\n{}", failures.join("\n"));
}

#[test]
fn test_bounds_hold_at_solution() {
    let config = SolveConfig::epsilon(Objective::PeRatio, vec![0.12, 0.0, 0.0, 1.0])
        .with_region(region(0.5, 0.1));
    let report = run(&ladder(), &config).unwrap();

    assert!(report.objectives[Objective::ExpectedReturn] >= 0.12 - TOL);
    assert!(report.objectives[Objective::CleanEnergy] >= 1.0 - TOL);
    assert_eq!(report.bounds.len(), 4);
    assert_eq!(report.bounds[3].objective, Objective::CleanEnergy);
    assert_eq!(report.bounds[3].direction, BoundDirection::AtLeast);
    let sum: f64 = report.weights.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn test_holdings_skip_unused_companies() {
    let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
        .with_region(region(0.5, 0.1));
    let report = run(&ladder(), &config).unwrap();

    let names: Vec<&str> = report.holdings.iter().map(|h| h.company.as_str()).collect();
    assert_eq!(names, vec!["C", "D"]);
}

#[test]
fn test_cap_too_low_is_infeasible() {
    let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
        .with_region(region(0.2, 0.1));
    let err = run(&ladder(), &config).unwrap_err();
    assert!(matches!(err, PortfolioError::Infeasible(_)));
    assert!(err.to_string().contains("weight cap"));
}

#[test]
fn test_zero_beta_tolerance_hits_unit_beta() {
    let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
        .with_region(region(0.6, 0.0));
    let report = run(&mixed_betas(), &config).unwrap();

    assert!(report.feasible, "{:?}", report.violations);
    assert!((report.beta - 1.0).abs() < 1e-6, "beta {}", report.beta);
    for (w, expected) in report.weights.iter().zip([0.05, 0.35, 0.6]) {
        assert!((w - expected).abs() < TOL, "{:?}", report.weights);
    }
}

#[test]
fn test_unreachable_beta_band_is_infeasible() {
    let t = table(vec![
        company("A", 1.2, [0.1, 0.5, 1.0, 0.0, 10.0]),
        company("B", 1.3, [0.1, 0.5, 1.0, 0.0, 10.0]),
        company("C", 1.5, [0.1, 0.5, 1.0, 0.0, 10.0]),
    ]);
    let config = SolveConfig::epsilon(Objective::ExpectedReturn, loose())
        .with_region(region(0.5, 0.0));
    assert!(matches!(run(&t, &config), Err(PortfolioError::Infeasible(_))));
}

#[test]
fn test_unreachable_bound_is_named() {
    // clean energy tops out at 2
    let config = SolveConfig::epsilon(Objective::PeRatio, vec![0.0, 0.0, 0.0, 5.0])
        .with_region(region(0.5, 0.1));
    let err = run(&ladder(), &config).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, PortfolioError::Infeasible(_)));
    assert!(msg.contains("Clean energy use >= 5"), "{}", msg);
    assert!(msg.contains("best achievable"), "{}", msg);
}

#[test]
fn test_jointly_unreachable_bounds() {
    // return >= 0.15 needs w_A >= 0.75, sustainability >= 0.6 needs
    // w_B >= 2/3; each alone is reachable
    let t = table(vec![
        company("A", 1.0, [0.2, 0.0, 1.0, 0.0, 10.0]),
        company("B", 1.0, [0.0, 0.9, 1.0, 0.0, 10.0]),
    ]);
    let config = SolveConfig::epsilon(Objective::DividendYield, vec![0.15, 0.6, 0.0, 100.0])
        .with_region(region(1.0, 0.1));
    let err = run(&t, &config).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("cannot hold simultaneously"), "{}", msg);
    // every portfolio in the region falls short of at least one bound
    assert!(msg.contains("a portfolio inside the region misses"), "{}", msg);
}

#[test]
fn test_wrong_number_of_bounds() {
    let config = SolveConfig::epsilon(Objective::PeRatio, vec![0.0, 0.0, 0.0])
        .with_region(region(0.5, 0.1));
    assert!(matches!(
        run(&ladder(), &config),
        Err(PortfolioError::InvalidInput(_))
    ));
}

#[test]
fn test_uniform_weights_optimal_for_identical_companies() {
    let t = table(vec![
        company("A", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
        company("B", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
        company("C", 1.0, [0.1, 0.5, 2.0, 1.0, 15.0]),
    ]);
    let r = region(0.5, 0.1);
    let uniform = t.uniform_weights();
    assert!(r.check(&t, &uniform).unwrap().is_feasible());
    let at_uniform = evaluate(&t, &uniform).unwrap();

    for objective in Objective::ALL {
        let bounds = match objective {
            Objective::PeRatio => vec![0.0; 4],
            _ => loose(),
        };
        let config = SolveConfig::epsilon(objective, bounds).with_region(r);
        let value = run(&t, &config).unwrap().optimized.unwrap().value;
        assert!((value - at_uniform.objectives[objective]).abs() < TOL, "{}", objective);
    }
}
