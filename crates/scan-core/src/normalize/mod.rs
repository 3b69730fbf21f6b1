//! Maps each analyzer's raw output into the canonical [`Finding`](crate::Finding)
//! schema. Pure: no I/O, no source-tree reads (spec.md §4.4, §8 "Normalizer
//! ∘ adapter is a pure function").

mod config;
mod dast;
mod redact;
mod sast;
mod sca;

pub use config::{normalize_config, ConfigProbeResult};
pub use dast::{normalize_dast, DastRawRecord};
pub use redact::redact_secrets;
pub use sast::{normalize_sast, SastRawResult};
pub use sca::{normalize_sca, ScaMatch};
