//! Seeded operation simulator.
//!
//! Applies random handle operations against a pool of shared owners and
//! observers of a single tracked resource, while a pure model predicts the
//! strong count. After every operation the observed counters, sole-owner
//! flags, expiry flags, and destruction ledger are cross-checked against the
//! model; mismatches are collected as [`Violation`]s.

use crate::handle::{Observer, Shared};
use crate::logging::TraceLog;
use crate::resource::Resource;
use crate::types::ResourceId;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Total operations to execute.
    pub total_operations: u64,
    /// Upper bound on simultaneous shared owners.
    pub max_owners: usize,
    /// Upper bound on simultaneous observers.
    pub max_observers: usize,
    pub stop_on_first_violation: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 10_000,
            max_owners: 32,
            max_observers: 8,
            stop_on_first_violation: true,
        }
    }
}

/// Operations the simulator can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOperation {
    /// Add a shared owner.
    CloneOwner,
    /// Drop one shared owner.
    DropOwner,
    /// Add an observer of the current resource.
    Downgrade,
    /// Checked upgrade of a random observer, temporary held within the op.
    Upgrade,
    /// Non-failing lock of a random observer.
    Lock,
    /// Drop every owner at once.
    Retire,
    /// Allocate a fresh resource after retirement.
    Respawn,
}

/// A semantics mismatch detected during simulation.
#[derive(Debug, Clone)]
pub enum Violation {
    CountMismatch {
        operation_index: u64,
        operation: SimulatedOperation,
        expected: usize,
        actual: usize,
    },
    SoleOwnerMismatch {
        operation_index: u64,
        expected: bool,
        actual: bool,
    },
    ExpiryMismatch {
        operation_index: u64,
        expected: bool,
        actual: bool,
    },
    UpgradeOutcome {
        operation_index: u64,
        expected_success: bool,
    },
    DestructionMiscount {
        resource: ResourceId,
        events: usize,
    },
}

#[derive(Debug)]
pub struct SimulationReport {
    pub seed: u64,
    pub operations_executed: u64,
    pub resources_spawned: u64,
    pub violations: Vec<Violation>,
}

impl SimulationReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Simulation seed: {}\n", self.seed));
        out.push_str(&format!("Operations executed: {}\n", self.operations_executed));
        out.push_str(&format!("Resources spawned: {}\n", self.resources_spawned));
        out.push_str(&format!("Violations: {}\n", self.violations.len()));
        for v in self.violations.iter().take(10) {
            out.push_str(&format!("  {v:?}\n"));
        }
        out.push_str(if self.passed() { "Result: PASS\n" } else { "Result: FAIL\n" });
        out
    }
}

/// Live handles for the resource currently under test, plus the model's
/// view of it. The model count is always `owners.len()`.
struct Round {
    id: ResourceId,
    owners: Vec<Shared<Resource>>,
    observers: Vec<Observer<Resource>>,
    retired: bool,
}

impl Round {
    fn spawn(log: &Arc<TraceLog>) -> Self {
        let resource = Resource::new(Arc::clone(log));
        let id = resource.id();
        Self {
            id,
            owners: vec![Shared::new(resource)],
            observers: Vec::new(),
            retired: false,
        }
    }

    fn model_count(&self) -> usize {
        self.owners.len()
    }
}

pub fn run_simulator(config: SimulatorConfig) -> SimulationReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let log = Arc::new(TraceLog::new());

    let mut round = Round::spawn(&log);
    let mut resources_spawned = 1u64;
    let mut violations = Vec::new();
    let mut executed = 0u64;

    for index in 0..config.total_operations {
        let op = pick_operation(&mut rng, &round, &config);
        apply_operation(op, index, &mut round, &log, &mut rng, &mut violations);
        if let SimulatedOperation::Respawn = op {
            resources_spawned += 1;
        }
        check_round(index, op, &round, &log, &mut violations);
        executed += 1;

        if config.stop_on_first_violation && !violations.is_empty() {
            break;
        }
    }

    SimulationReport {
        seed: config.seed,
        operations_executed: executed,
        resources_spawned,
        violations,
    }
}

fn pick_operation(rng: &mut StdRng, round: &Round, config: &SimulatorConfig) -> SimulatedOperation {
    if round.retired {
        // Only liveness queries make sense until a fresh resource exists.
        return if rng.gen_bool(0.5) {
            SimulatedOperation::Respawn
        } else if rng.gen_bool(0.5) {
            SimulatedOperation::Upgrade
        } else {
            SimulatedOperation::Lock
        };
    }

    match rng.gen_range(0..100u32) {
        0..=29 if round.owners.len() < config.max_owners => SimulatedOperation::CloneOwner,
        30..=54 if round.owners.len() > 1 => SimulatedOperation::DropOwner,
        55..=69 if round.observers.len() < config.max_observers => SimulatedOperation::Downgrade,
        70..=79 if !round.observers.is_empty() => SimulatedOperation::Upgrade,
        80..=89 if !round.observers.is_empty() => SimulatedOperation::Lock,
        90..=94 => SimulatedOperation::Retire,
        _ if round.owners.len() < config.max_owners => SimulatedOperation::CloneOwner,
        _ => SimulatedOperation::DropOwner,
    }
}

fn apply_operation(
    op: SimulatedOperation,
    index: u64,
    round: &mut Round,
    log: &Arc<TraceLog>,
    rng: &mut StdRng,
    violations: &mut Vec<Violation>,
) {
    match op {
        SimulatedOperation::CloneOwner => {
            if round.retired {
                return;
            }
            if let Some(first) = round.owners.first() {
                let clone = first.clone();
                round.owners.push(clone);
            }
        }
        SimulatedOperation::DropOwner => {
            if round.owners.len() > 1 {
                let victim = rng.gen_range(0..round.owners.len());
                round.owners.swap_remove(victim);
            }
        }
        SimulatedOperation::Downgrade => {
            if let Some(first) = round.owners.first() {
                round.observers.push(first.downgrade());
            }
        }
        SimulatedOperation::Upgrade => {
            if round.observers.is_empty() {
                return;
            }
            let obs = &round.observers[rng.gen_range(0..round.observers.len())];
            let expected_success = !round.owners.is_empty();
            match obs.upgrade() {
                Ok(tmp) => {
                    if !expected_success {
                        violations.push(Violation::UpgradeOutcome {
                            operation_index: index,
                            expected_success,
                        });
                    } else if tmp.use_count() != round.model_count() + 1 {
                        violations.push(Violation::CountMismatch {
                            operation_index: index,
                            operation: op,
                            expected: round.model_count() + 1,
                            actual: tmp.use_count(),
                        });
                    }
                }
                Err(_) => {
                    if expected_success {
                        violations.push(Violation::UpgradeOutcome {
                            operation_index: index,
                            expected_success,
                        });
                    }
                }
            }
        }
        SimulatedOperation::Lock => {
            if round.observers.is_empty() {
                return;
            }
            let obs = &round.observers[rng.gen_range(0..round.observers.len())];
            let tmp = obs.lock();
            let expected_success = !round.owners.is_empty();
            if tmp.is_empty() == expected_success {
                violations.push(Violation::UpgradeOutcome {
                    operation_index: index,
                    expected_success,
                });
            }
        }
        SimulatedOperation::Retire => {
            round.owners.clear();
            round.retired = true;
            let events = log.destruction_count(round.id);
            if events != 1 {
                violations.push(Violation::DestructionMiscount {
                    resource: round.id,
                    events,
                });
            }
        }
        SimulatedOperation::Respawn => {
            *round = Round::spawn(log);
        }
    }
}

fn check_round(
    index: u64,
    op: SimulatedOperation,
    round: &Round,
    log: &Arc<TraceLog>,
    violations: &mut Vec<Violation>,
) {
    let expected = round.model_count();

    for owner in &round.owners {
        if owner.use_count() != expected {
            violations.push(Violation::CountMismatch {
                operation_index: index,
                operation: op,
                expected,
                actual: owner.use_count(),
            });
        }
        let expect_sole = expected == 1;
        if owner.is_sole_owner() != expect_sole {
            violations.push(Violation::SoleOwnerMismatch {
                operation_index: index,
                expected: expect_sole,
                actual: owner.is_sole_owner(),
            });
        }
    }

    for obs in &round.observers {
        let expect_expired = expected == 0;
        if obs.expired() != expect_expired {
            violations.push(Violation::ExpiryMismatch {
                operation_index: index,
                expected: expect_expired,
                actual: obs.expired(),
            });
        }
        if obs.use_count() != expected {
            violations.push(Violation::CountMismatch {
                operation_index: index,
                operation: op,
                expected,
                actual: obs.use_count(),
            });
        }
    }

    // The resource either still lives (no destruction event yet) or has
    // exactly one.
    let events = log.destruction_count(round.id);
    let expected_events = usize::from(round.retired || round.owners.is_empty());
    if events != expected_events {
        violations.push(Violation::DestructionMiscount {
            resource: round.id,
            events,
        });
    }
}
