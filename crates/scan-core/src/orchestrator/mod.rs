//! Plan-driven dispatch of analyzer adapters with per-stage fault
//! isolation (spec.md §4.5).

mod dispatch;
mod ports;
mod workspace;

pub use dispatch::{orchestrate, orchestrate_with_cancel, CancelSignal};
pub use ports::{
    AnalyzerAdapters, ConfigAdapter, DastAdapter, ResultSink, SastAdapter, SbomAdapter, ScaAdapter,
};
pub use workspace::{resolve_workspace, Workspace};
