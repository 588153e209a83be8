use clap::{value_parser, Arg, ArgAction, Command};
use own_lab::harness::{run_simulator, Harness, SimulatorConfig};
use own_lab::scenario::{DemoConfig, Demonstrator};
use own_lab::types::ScenarioKind;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("own-lab")
        .version("0.1.0")
        .about("Ownership-semantics demonstrator")
        .arg_required_else_help(false)
        .subcommand(
            Command::new("demo")
                .about("Run the scripted ownership scenarios")
                .arg(
                    Arg::new("scenario")
                        .long("scenario")
                        .value_parser(value_parser!(ScenarioKind))
                        .help("Run a single scenario (exclusive, shared, weak)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Emit scenario reports as JSON instead of trace lines"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run the randomized semantics checker")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first violation"),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Run a large fixed-seed stress sweep")
                .arg(
                    Arg::new("owners")
                        .long("owners")
                        .default_value("64")
                        .value_parser(value_parser!(usize))
                        .help("Maximum simultaneous shared owners"),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .default_value("100000")
                        .value_parser(value_parser!(usize))
                        .help("Number of operations"),
                ),
        )
        .subcommand(
            Command::new("verify-log")
                .about("Run all scenarios, then verify trace-log integrity"),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("demo", args)) => {
            let json = args.get_flag("json");
            let demo = Demonstrator::with_config(DemoConfig { echo_trace: !json });

            let outcome = match args.get_one::<ScenarioKind>("scenario") {
                Some(kind) => demo.run(*kind).map(|r| vec![r]),
                None => demo.run_all(),
            };

            match outcome {
                Ok(reports) => {
                    if json {
                        match serde_json::to_string_pretty(&reports) {
                            Ok(body) => println!("{body}"),
                            Err(e) => {
                                eprintln!("failed to encode reports: {e}");
                                std::process::exit(1);
                            }
                        }
                    }
                }
                Err(e) => {
                    eprintln!("FATAL: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(("simulate", args)) => {
            let operations = *args.get_one::<u64>("operations").unwrap();
            let seed = *args.get_one::<u64>("seed").unwrap();
            let stop_on_violation = args.get_flag("stop-on-violation");

            println!("Running ownership simulator...");
            println!("Operations: {}", operations);
            println!("Seed: {}", seed);
            println!();

            let config = SimulatorConfig {
                seed,
                total_operations: operations,
                stop_on_first_violation: stop_on_violation,
                ..Default::default()
            };

            let report = run_simulator(config);

            println!("{}", report.generate_text());

            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("stress", args)) => {
            let owners = *args.get_one::<usize>("owners").unwrap();
            let iterations = *args.get_one::<usize>("iterations").unwrap();

            println!("Running stress test...");
            println!("Max owners: {}", owners);
            println!("Iterations: {}", iterations);
            println!();

            let report = Harness::run_stress_test(owners, iterations);

            println!("Stress Test Report:");
            println!("  Max owners: {}", report.max_owners);
            println!("  Iterations: {}", report.iterations);
            println!("  Violations: {}", report.violations);
            println!("  Success: {}", report.success);

            std::process::exit(if report.success { 0 } else { 1 });
        }
        Some(("verify-log", _)) => {
            let demo = Demonstrator::with_config(DemoConfig { echo_trace: false });
            match demo.run_all() {
                Ok(reports) => {
                    let destroyed: usize = reports.iter().map(|r| r.destroyed.len()).sum();
                    match demo.log().verify_integrity() {
                        Ok(()) => {
                            println!("Trace log integrity: VALID");
                            println!("Events checked: {}", demo.log().len());
                            println!("Destruction events: {}", destroyed);
                        }
                        Err(e) => {
                            println!("Trace log integrity: INVALID ({e})");
                            std::process::exit(1);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("FATAL: {e}");
                    std::process::exit(1);
                }
            }
        }
        _ => {
            // No subcommand behaves like `demo`.
            let demo = Demonstrator::new();
            if let Err(e) = demo.run_all() {
                eprintln!("FATAL: {e}");
                std::process::exit(1);
            }
        }
    }
}
