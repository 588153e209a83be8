//! The three scripted ownership scenarios. Each runs in its own lexical
//! scope, records lifetime events into the shared [`TraceLog`], and checks
//! its postconditions; any mismatch comes back as an
//! [`InvariantViolation`].

use crate::error::{DemoError, InvariantViolation};
use crate::handle::{pass_through, Exclusive, Observer, Shared};
use crate::logging::{TraceKind, TraceLog};
use crate::resource::Resource;
use crate::types::{ResourceId, ScenarioKind};
use serde::Serialize;
use std::sync::Arc;

/// Demonstrator configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Echo trace lines to stdout as they are produced.
    pub echo_trace: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self { echo_trace: true }
    }
}

/// Observable outcome of one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: ScenarioKind,
    /// Identities created by this scenario, in creation order.
    pub resources: Vec<ResourceId>,
    /// Identities destroyed by this scenario, in destruction order.
    pub destroyed: Vec<ResourceId>,
    /// Human-readable trace lines.
    pub steps: Vec<String>,
}

impl ScenarioReport {
    fn new(scenario: ScenarioKind) -> Self {
        Self {
            scenario,
            resources: Vec::new(),
            destroyed: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Runs the scenarios against one shared trace log.
pub struct Demonstrator {
    config: DemoConfig,
    log: Arc<TraceLog>,
}

impl Demonstrator {
    pub fn new() -> Self {
        Self::with_config(DemoConfig::default())
    }

    pub fn with_config(config: DemoConfig) -> Self {
        Self {
            config,
            log: Arc::new(TraceLog::new()),
        }
    }

    pub fn log(&self) -> &Arc<TraceLog> {
        &self.log
    }

    /// Run all three scenarios in order.
    pub fn run_all(&self) -> Result<Vec<ScenarioReport>, DemoError> {
        ScenarioKind::ALL.iter().map(|k| self.run(*k)).collect()
    }

    pub fn run(&self, kind: ScenarioKind) -> Result<ScenarioReport, DemoError> {
        tracing::debug!(scenario = %kind, "running scenario");
        if self.config.echo_trace {
            println!("---- {kind} ----");
        }
        match kind {
            ScenarioKind::Exclusive => self.run_exclusive(),
            ScenarioKind::Shared => self.run_shared(),
            ScenarioKind::Weak => self.run_weak(),
        }
    }

    /// Exclusive ownership: one owner at a time, transfer empties the
    /// source, destruction fires once per resource in reverse scope order.
    fn run_exclusive(&self) -> Result<ScenarioReport, DemoError> {
        let mut report = ScenarioReport::new(ScenarioKind::Exclusive);
        let destroyed_before = self.log.destruction_order().len();

        let (id_a, id_fresh) = {
            let resource_a = Resource::new(Arc::clone(&self.log));
            let id_a = resource_a.id();
            report.resources.push(id_a);
            let mut u1 = Exclusive::new(resource_a);
            self.step(&mut report, format!("u1 holds {id_a}"));

            let mut u2 = u1.transfer();
            self.log.record(TraceKind::Transferred, id_a, None);
            self.step(
                &mut report,
                format!("u1 -> u2: u1 empty={} u2 empty={}", u1.is_empty(), u2.is_empty()),
            );
            ensure_eq(ScenarioKind::Exclusive, "u1 empty after transfer", true, u1.is_empty())?;

            let u3 = pass_through(u2.transfer());
            self.log.record(TraceKind::Transferred, id_a, None);
            ensure_eq(ScenarioKind::Exclusive, "u2 empty after forward", true, u2.is_empty())?;
            ensure_eq(
                ScenarioKind::Exclusive,
                "u3 holds the original identity",
                Some(id_a),
                u3.get().map(Resource::id),
            )?;

            let fresh = Resource::new(Arc::clone(&self.log));
            let id_fresh = fresh.id();
            report.resources.push(id_fresh);
            let u4 = pass_through(Exclusive::new(fresh));
            ensure_eq(
                ScenarioKind::Exclusive,
                "u4 holds a distinct identity",
                false,
                u4.get().map(Resource::id) == Some(id_a),
            )?;
            self.step(
                &mut report,
                format!("u3 holds {id_a}, u4 holds {id_fresh}"),
            );
            (id_a, id_fresh)
            // u4 then u3 drop here, reverse declaration order
        };

        report.destroyed = self.log.destruction_order()[destroyed_before..].to_vec();
        let destroyed_len = report.destroyed.len();
        self.step(
            &mut report,
            format!("scope exit destroyed {destroyed_len} resources"),
        );
        ensure_eq(
            ScenarioKind::Exclusive,
            "destruction order is reverse of scope entry",
            vec![id_fresh, id_a],
            report.destroyed.clone(),
        )?;
        for id in [id_a, id_fresh] {
            ensure_eq(
                ScenarioKind::Exclusive,
                "destroyed exactly once",
                1,
                self.log.destruction_count(id),
            )?;
        }
        Ok(report)
    }

    /// Shared ownership: the count moves by one per clone and per release,
    /// and the resource dies the instant the count reaches zero.
    fn run_shared(&self) -> Result<ScenarioReport, DemoError> {
        let mut report = ScenarioReport::new(ScenarioKind::Shared);
        let destroyed_before = self.log.destruction_order().len();

        {
            let resource_b = Resource::new(Arc::clone(&self.log));
            let id_b = resource_b.id();
            report.resources.push(id_b);
            let mut s1 = Shared::new(resource_b);
            self.step(
                &mut report,
                format!("s1 holds {id_b}, count={}", s1.use_count()),
            );
            ensure_eq(ScenarioKind::Shared, "single owner at creation", 1, s1.use_count())?;

            {
                let s2 = s1.clone();
                self.log.record(TraceKind::Cloned, id_b, Some(s1.use_count()));
                self.step(
                    &mut report,
                    format!(
                        "s2 joins: count={} s1 sole={}",
                        s2.use_count(),
                        s1.is_sole_owner()
                    ),
                );
                ensure_eq(ScenarioKind::Shared, "count after clone", 2, s1.use_count())?;
                ensure_eq(ScenarioKind::Shared, "clones agree on count", 2, s2.use_count())?;
                ensure_eq(
                    ScenarioKind::Shared,
                    "not sole owner while shared",
                    false,
                    s1.is_sole_owner(),
                )?;
            }
            self.log.record(TraceKind::Released, id_b, Some(s1.use_count()));
            self.step(
                &mut report,
                format!(
                    "s2 left: count={} s1 sole={}",
                    s1.use_count(),
                    s1.is_sole_owner()
                ),
            );
            ensure_eq(ScenarioKind::Shared, "count after s2 exits", 1, s1.use_count())?;
            ensure_eq(ScenarioKind::Shared, "sole owner again", true, s1.is_sole_owner())?;

            s1.reset();
            self.step(
                &mut report,
                format!(
                    "s1 reset: count={} sole={}",
                    s1.use_count(),
                    s1.is_sole_owner()
                ),
            );
            ensure_eq(ScenarioKind::Shared, "count after reset", 0, s1.use_count())?;
            // an empty handle is never "unique"
            ensure_eq(
                ScenarioKind::Shared,
                "empty handle is not sole owner",
                false,
                s1.is_sole_owner(),
            )?;
            ensure_eq(
                ScenarioKind::Shared,
                "reset destroys the last-owned resource immediately",
                1,
                self.log.destruction_count(id_b),
            )?;
        }

        report.destroyed = self.log.destruction_order()[destroyed_before..].to_vec();
        ensure_eq(
            ScenarioKind::Shared,
            "exactly one destruction in scenario",
            1,
            report.destroyed.len(),
        )?;
        Ok(report)
    }

    /// Weak observation: liveness queries and temporary upgrades, never a
    /// dangling reference.
    fn run_weak(&self) -> Result<ScenarioReport, DemoError> {
        let mut report = ScenarioReport::new(ScenarioKind::Weak);
        let destroyed_before = self.log.destruction_order().len();

        let mut w: Observer<Resource> = Observer::detached();
        self.step(
            &mut report,
            format!("w detached: expired={} count={}", w.expired(), w.use_count()),
        );
        ensure_eq(ScenarioKind::Weak, "detached observer is expired", true, w.expired())?;
        ensure_eq(ScenarioKind::Weak, "detached observer count", 0, w.use_count())?;

        let id_c = {
            let resource_c = Resource::new(Arc::clone(&self.log));
            let id_c = resource_c.id();
            report.resources.push(id_c);
            let s1 = Shared::new(resource_c);
            w.bind(&s1);
            self.log.record(TraceKind::Observed, id_c, Some(w.use_count()));
            self.step(
                &mut report,
                format!("w bound to {id_c}: expired={} count={}", w.expired(), w.use_count()),
            );
            ensure_eq(ScenarioKind::Weak, "bound observer is live", false, w.expired())?;
            ensure_eq(ScenarioKind::Weak, "count with one owner", 1, w.use_count())?;

            {
                let tmp = w.upgrade()?;
                self.log.record(TraceKind::Upgraded, id_c, Some(w.use_count()));
                self.step(
                    &mut report,
                    format!("upgrade: count={} tmp sole={}", w.use_count(), tmp.is_sole_owner()),
                );
                ensure_eq(ScenarioKind::Weak, "upgrade adds one owner", 2, w.use_count())?;
                ensure_eq(ScenarioKind::Weak, "temporary is not sole owner", false, tmp.is_sole_owner())?;
            }
            ensure_eq(ScenarioKind::Weak, "count after upgrade scope", 1, w.use_count())?;

            {
                let tmp = w.lock();
                self.log.record(TraceKind::Upgraded, id_c, Some(w.use_count()));
                self.step(
                    &mut report,
                    format!("lock: count={} tmp empty={}", w.use_count(), tmp.is_empty()),
                );
                ensure_eq(ScenarioKind::Weak, "lock of a live target succeeds", false, tmp.is_empty())?;
                ensure_eq(ScenarioKind::Weak, "lock adds one owner", 2, w.use_count())?;
            }
            ensure_eq(ScenarioKind::Weak, "count after lock scope", 1, w.use_count())?;
            id_c
            // s1 drops here; last owner gone
        };

        self.step(
            &mut report,
            format!("owners gone: expired={} count={}", w.expired(), w.use_count()),
        );
        ensure_eq(ScenarioKind::Weak, "observer expired after last owner", true, w.expired())?;
        ensure_eq(ScenarioKind::Weak, "count after expiry", 0, w.use_count())?;
        ensure_eq(ScenarioKind::Weak, "upgrade of expired target fails", true, w.upgrade().is_err())?;
        ensure_eq(ScenarioKind::Weak, "lock of expired target is empty", true, w.lock().is_empty())?;
        ensure_eq(
            ScenarioKind::Weak,
            "destroyed exactly once",
            1,
            self.log.destruction_count(id_c),
        )?;

        report.destroyed = self.log.destruction_order()[destroyed_before..].to_vec();
        Ok(report)
    }

    fn step(&self, report: &mut ScenarioReport, line: String) {
        if self.config.echo_trace {
            println!("{line}");
        }
        report.steps.push(line);
    }
}

impl Default for Demonstrator {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_eq<T: PartialEq + std::fmt::Debug>(
    scenario: ScenarioKind,
    check: &'static str,
    expected: T,
    actual: T,
) -> Result<(), InvariantViolation> {
    if expected == actual {
        Ok(())
    } else {
        #[cfg(feature = "strict-debug")]
        panic!("{scenario} scenario: {check}: expected {expected:?}, got {actual:?}");

        Err(InvariantViolation {
            scenario,
            check,
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        })
    }
}
