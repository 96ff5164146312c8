//! The engine collaborator trait.
//!
//! The workflow engine is an opaque collaborator: it owns job scheduling,
//! persistence, and recovery. The adapter only needs three operations from
//! it, and each may block for the duration of the engine's own network or
//! database work:
//!
//! ```text
//!   load_code() ──→ load_node() ──→ submit()
//!    (resolve)       (resolve)     (fire-and-forget)
//! ```
//!
//! A lookup that does not resolve to an existing entity is an error, never a
//! default. `submit()` is called at most once per adapter invocation and the
//! returned pk is the engine's handle to the new job; the adapter does not
//! poll or wait on it.

use async_trait::async_trait;

use crate::calculation::YamboCalculation;
use crate::error::EngineResult;
use crate::node::{Code, Pk, ProcessNode};

/// Trait for workflow engines that can run a `YamboCalculation`.
///
/// Implementations are substitutable: production code talks to the engine's
/// REST API via [`RestEngine`](crate::RestEngine), tests use an in-process
/// stub recording calls.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Resolve a code label to an installed executable.
    async fn load_code(&self, label: &str) -> EngineResult<Code>;

    /// Load a calculation node by primary key.
    async fn load_node(&self, pk: Pk) -> EngineResult<ProcessNode>;

    /// Submit a calculation for asynchronous execution.
    ///
    /// Returns the pk of the newly created process. Exactly one job is
    /// created in the engine's tracking store per successful call.
    async fn submit(&self, calc: &YamboCalculation) -> EngineResult<Pk>;
}
