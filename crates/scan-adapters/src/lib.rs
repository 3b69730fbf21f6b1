//! Concrete subprocess and HTTP transport for the ports `scan-core`
//! defines: one adapter per analyzer family, a vendor-agnostic model
//! provider, and an HTTP result-callback sink.

mod config;
mod dast;
mod model_provider;
mod result_sink;
mod sast;
mod sbom;
mod sca;
mod subprocess;

pub use config::HttpConfigAdapter;
pub use dast::{DastProfile, NucleiAdapter};
pub use model_provider::HttpModelProvider;
pub use result_sink::HttpResultSink;
pub use sast::SemgrepAdapter;
pub use sbom::CyclonedxAdapter;
pub use sca::GrypeAdapter;
