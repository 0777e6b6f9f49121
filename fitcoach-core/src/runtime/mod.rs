//! Plan-generation runtime.

mod executor;

pub use executor::{PlanExecutor, PlanExecutorBuilder};
