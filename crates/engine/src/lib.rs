//! `engine` crate — domain models, condition evaluation, template rendering,
//! and the workflow execution orchestrator.
//!
//! The engine is a library invoked in-process by the host application; it
//! owns no network surface of its own.  Storage and outbound mail are
//! injected through the [`EngineStore`] and [`mailer::EmailSender`] traits,
//! with lifecycle owned by the host's startup sequence.

pub mod models;
pub mod error;
pub mod store;
pub mod conditions;
pub mod context;
pub mod render;
pub mod token;
pub mod executor;
pub mod memory;

pub use models::{
    Candidate, EmailKind, EmailTemplate, ExecutionStatus, Job, NewEmailLog, Offer, OfferStatus,
    Stage, Workflow, WorkflowExecution,
};
pub use error::EngineError;
pub use store::{EngineStore, StoreError};
pub use conditions::conditions_met;
pub use executor::{RunOutcome, RunnerConfig, SkipReason, WorkflowRunner};
pub use memory::MemoryStore;
