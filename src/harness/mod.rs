//! Randomized checking of the handle semantics against a pure count model.

pub mod simulator;

pub use simulator::*;

/// Harness for running stress and certification sweeps over the simulator.
pub struct Harness;

impl Harness {
    /// One large seeded run.
    pub fn run_stress_test(max_owners: usize, iterations: usize) -> StressTestReport {
        let config = SimulatorConfig {
            seed: 12345,
            total_operations: iterations as u64,
            max_owners,
            ..Default::default()
        };

        let report = run_simulator(config);

        StressTestReport {
            max_owners,
            iterations,
            violations: report.violations.len(),
            success: report.passed(),
        }
    }

    /// Many seeds, a shorter run each.
    pub fn run_certification(seeds: u64, operations_per_seed: u64) -> CertificationReport {
        let mut all_passed = true;
        let mut total_violations = 0;

        for seed in 0..seeds {
            let config = SimulatorConfig {
                seed,
                total_operations: operations_per_seed,
                ..Default::default()
            };
            let report = run_simulator(config);
            if !report.passed() {
                all_passed = false;
            }
            total_violations += report.violations.len();
        }

        CertificationReport {
            passed: all_passed && total_violations == 0,
            total_violations,
            seeds_tested: seeds,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StressTestReport {
    pub max_owners: usize,
    pub iterations: usize,
    pub violations: usize,
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct CertificationReport {
    pub passed: bool,
    pub total_violations: usize,
    pub seeds_tested: u64,
}
