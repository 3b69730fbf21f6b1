//! Core scan pipeline: planning, policy enforcement, tool-output normalization,
//! deduplication and risk intelligence for the security scan control system.
//!
//! This crate contains no subprocess or outbound-network code itself beyond
//! the orchestrator's own workspace (temp-dir/clone) housekeeping. Analyzer
//! execution, the live HTTP config probe, and model-provider calls are all
//! expressed as traits ([`orchestrator::SastAdapter`] and its siblings,
//! [`planner::ModelProvider`], and [`orchestrator::ResultSink`]) so that
//! `scan-adapters` (or a test double) can supply the concrete transport.

pub mod config;
pub mod dedup;
pub mod entity;
pub mod errors;
pub mod fingerprint;
pub mod gatekeeper;
pub mod intelligence;
pub mod lifecycle;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod planner;
pub mod remediation;
pub mod scope;

pub use config::PipelineConfig;
pub use errors::PipelineError;
pub use model::{
    AgentContext, Category, Confidence, ExecutionPlan, Finding, FindingEntity, ScanLimits,
    ScanRequest, ScanResult, ScanStatus, ScopePolicy, Severity,
};
