//! Ownership-semantics demonstrator.
//!
//! Three handle disciplines over a tracked [`resource::Resource`]:
//! move-only exclusive ownership ([`handle::Exclusive`]), reference-counted
//! shared ownership ([`handle::Shared`]), and non-owning weak observation
//! ([`handle::Observer`]). Scripted scenarios in [`scenario`] exercise the
//! disciplines and check their invariants; every lifetime event lands in a
//! hash-chained [`logging::TraceLog`], and [`harness`] cross-checks the
//! semantics against a pure count model under random operation streams.

pub mod error;
pub mod handle;
pub mod harness;
pub mod logging;
pub mod resource;
pub mod scenario;
pub mod types;

pub use error::*;
pub use handle::{pass_through, Exclusive, Observer, Shared};
pub use logging::{TraceEvent, TraceKind, TraceLog};
pub use resource::Resource;
pub use scenario::{DemoConfig, Demonstrator, ScenarioReport};
pub use types::*;

pub use harness::{run_simulator, Harness, SimulationReport, SimulatorConfig};
