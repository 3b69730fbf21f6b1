//! Groups deduplicated findings into entities, correlates across
//! categories, and collapses duplicate dependency advisories (spec.md §4.7).

mod builder;
mod sca_collapse;
mod semantic_merge;

pub use builder::build_entities;
pub use sca_collapse::sca_collapse;
pub use semantic_merge::semantic_merge;
