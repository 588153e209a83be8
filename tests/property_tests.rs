use own_lab::harness::{run_simulator, Harness, SimulatorConfig};
use own_lab::logging::TraceLog;
use own_lab::resource::Resource;
use own_lab::{Observer, Shared};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    // Arbitrary clone/drop scripts: the observed strong count always equals
    // the number of live owners, and the resource dies exactly once, at the
    // moment the last owner goes.
    #[test]
    fn prop_counts_follow_the_model(script in proptest::collection::vec(any::<bool>(), 1..200)) {
        let log = Arc::new(TraceLog::new());
        let resource = Resource::new(Arc::clone(&log));
        let id = resource.id();
        let mut owners = vec![Shared::new(resource)];
        let observer = Observer::of(&owners[0]);

        for add_owner in script {
            if add_owner || owners.len() == 1 {
                let joined = owners[0].clone();
                owners.push(joined);
            } else {
                owners.pop();
            }
            prop_assert_eq!(owners[0].use_count(), owners.len());
            prop_assert_eq!(owners[0].is_sole_owner(), owners.len() == 1);
            prop_assert_eq!(observer.use_count(), owners.len());
            prop_assert!(!observer.expired());
            prop_assert_eq!(log.destruction_count(id), 0);
        }

        owners.clear();
        prop_assert_eq!(log.destruction_count(id), 1);
        prop_assert!(observer.expired());
        prop_assert!(observer.upgrade().is_err());
        prop_assert!(log.verify_integrity().is_ok());
    }

    // Upgrading mid-script always raises the count by exactly one for the
    // temporary's lifetime.
    #[test]
    fn prop_upgrade_envelope(extra_owners in 0usize..16) {
        let base = Shared::new(());
        let owners: Vec<Shared<()>> = (0..extra_owners).map(|_| base.clone()).collect();
        let observer = Observer::of(&base);

        let before = observer.use_count();
        {
            let tmp = observer.upgrade().unwrap();
            prop_assert_eq!(tmp.use_count(), before + 1);
        }
        prop_assert_eq!(observer.use_count(), before);
        prop_assert_eq!(before, owners.len() + 1);
    }
}

#[test]
fn test_simulator_over_multiple_seeds() {
    for seed in [0, 1, 7, 42, 1337] {
        let report = run_simulator(SimulatorConfig {
            seed,
            total_operations: 2_000,
            ..Default::default()
        });
        assert!(report.passed(), "seed {seed}:\n{}", report.generate_text());
    }
}

#[test]
fn test_certification_sweep() {
    let report = Harness::run_certification(5, 1_000);
    assert!(report.passed);
    assert_eq!(report.seeds_tested, 5);
    assert_eq!(report.total_violations, 0);
}
