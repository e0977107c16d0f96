pub mod engine;
pub mod error;
pub mod resolver;
pub mod runtime;
pub mod store;

pub use engine::{ClearanceEngine, CycleOutput};
pub use error::EngineError;
pub use resolver::ElevationResolver;
pub use runtime::{run_engine, EngineEvent};
pub use store::ElevationStore;
