//! Client for the workflow-orchestration engine running Yambo calculations.
//!
//! This crate models the one interaction the `yambo-submit` adapter has with
//! the engine: resolve a handful of stored entities, hand over a fully
//! populated [`YamboCalculation`] request, and receive the pk of the job the
//! engine created. Everything after submission — scheduling, retries,
//! parsing of results — is the engine's business and is not modelled here.
//!
//! # Overview
//!
//! - [`Engine`] — the collaborator trait (`load_code`, `load_node`,
//!   `submit`), substitutable with a stub in tests.
//! - [`RestEngine`] — the production implementation over the engine's REST
//!   API.
//! - [`YamboCalculation`] — the write-once submission request, with its
//!   scheduler options and plugin settings.
//! - [`Code`], [`ProcessNode`], [`RemoteFolder`], [`Pk`] — the entity types
//!   the adapter reads from the engine's store.
//!
//! # Example
//!
//! ```ignore
//! use yambo_engine::{Engine, Resources, RestEngine, SchedulerOptions, YamboCalculation};
//!
//! let engine = RestEngine::new("http://localhost:8023/api/v1", None)?;
//!
//! let code = engine.load_code("yambo-5.2@lumi").await?;
//! let precode = engine.load_code("p2y-5.2@lumi").await?;
//! let parent = engine.load_node(512.into()).await?;
//!
//! let resources = Resources::new(2, 4, 2);
//! let options = SchedulerOptions::new(3600, resources)
//!     .with_prepend_text(resources.omp_export());
//!
//! let calc = YamboCalculation::new(code, precode, parent.remote_folder()?.clone(), options);
//! let pk = engine.submit(&calc).await?;
//! println!("pk = {pk}");
//! ```

pub mod api;
pub mod calculation;
pub mod engine;
pub mod error;
pub mod node;

// Re-exports
pub use api::{DEFAULT_URL, RestEngine};
pub use calculation::{Metadata, Parameters, Resources, SchedulerOptions, Settings, YamboCalculation};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use node::{Code, Pk, ProcessNode, ProcessOutputs, RemoteFolder};
