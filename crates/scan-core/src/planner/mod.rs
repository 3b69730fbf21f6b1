//! Converts safe [`AgentContext`](crate::model::AgentContext) metadata into
//! an [`ExecutionPlan`](crate::model::ExecutionPlan) (spec.md §4.1).

mod baseline;
mod model_backed;
pub mod port;

pub use baseline::baseline_plan;
pub use model_backed::{plan_with_model, PlannerOptions};
pub use port::{ModelProvider, NullModelProvider};
