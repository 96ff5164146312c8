//! The `YamboCalculation` submission request.
//!
//! A request is write-once: it is assembled from resolved entities and
//! scheduler options, then handed to [`Engine::submit`](crate::Engine::submit)
//! unchanged. Optional scheduler fields that were never set are absent from
//! the serialized request, not null.
//!
//! ```ignore
//! use yambo_engine::{Code, RemoteFolder, Resources, SchedulerOptions, YamboCalculation};
//!
//! let resources = Resources::new(2, 4, 2);
//! let options = SchedulerOptions::new(3600, resources)
//!     .with_queue_name("batch");
//!
//! let calc = YamboCalculation::new(code, precode, parent_folder, options);
//! let pk = engine.submit(&calc).await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::node::{Code, RemoteFolder};

/// Job-scheduler resource request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// Number of machines (nodes) to allocate.
    pub num_machines: u32,
    /// MPI processes per machine.
    pub num_mpiprocs_per_machine: u32,
    /// Threads per MPI process.
    pub num_cores_per_mpiproc: u32,
}

impl Resources {
    /// Create a resource request.
    pub fn new(num_machines: u32, num_mpiprocs_per_machine: u32, num_cores_per_mpiproc: u32) -> Self {
        Self {
            num_machines,
            num_mpiprocs_per_machine,
            num_cores_per_mpiproc,
        }
    }

    /// Shell line exporting the OpenMP thread count matching this request.
    pub fn omp_export(&self) -> String {
        format!("export OMP_NUM_THREADS={}", self.num_cores_per_mpiproc)
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

/// Scheduler-facing options of a submission request.
///
/// The optional fields map to scheduler hints (`queue_name`, `qos`,
/// `account`) and are serialized only when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerOptions {
    /// Wall-clock limit in seconds.
    pub max_wallclock_seconds: u64,
    /// Resource request handed to the batch scheduler.
    pub resources: Resources,
    /// Queue (PBS) or partition (SLURM) name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
    /// Quality-of-service class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos: Option<String>,
    /// Billing account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Shell lines prepended to the job script, before the calculation runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepend_text: Option<String>,
}

impl SchedulerOptions {
    /// Create scheduler options with the given wall-clock limit and resources.
    pub fn new(max_wallclock_seconds: u64, resources: Resources) -> Self {
        Self {
            max_wallclock_seconds,
            resources,
            queue_name: None,
            qos: None,
            account: None,
            prepend_text: None,
        }
    }

    /// Set the queue/partition name.
    pub fn with_queue_name(mut self, queue_name: impl Into<String>) -> Self {
        self.queue_name = Some(queue_name.into());
        self
    }

    /// Set the quality-of-service class.
    pub fn with_qos(mut self, qos: impl Into<String>) -> Self {
        self.qos = Some(qos.into());
        self
    }

    /// Set the billing account.
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the environment-preparation directive.
    pub fn with_prepend_text(mut self, prepend_text: impl Into<String>) -> Self {
        self.prepend_text = Some(prepend_text.into());
        self
    }
}

/// Calculation input payload: plain arguments and namelist variables.
///
/// An initialise-only run carries an empty payload; the plugin fills in the
/// setup namelist on the remote side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    /// Positional runtime arguments.
    pub arguments: Vec<String>,
    /// Input-file variables, keyed by namelist name.
    pub variables: serde_json::Map<String, serde_json::Value>,
}

/// Plugin behaviour flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Run the p2y/setup initialisation step.
    #[serde(rename = "INITIALISE")]
    pub initialise: bool,
    /// Copy the parent's databases instead of linking them.
    #[serde(rename = "COPY_DBS")]
    pub copy_dbs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initialise: true,
            copy_dbs: false,
        }
    }
}

/// Process metadata of a submission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Scheduler-facing options.
    pub options: SchedulerOptions,
}

/// A fully populated `YamboCalculation` submission request.
///
/// Exclusively constructed and owned by the adapter until handed to the
/// engine; after submission the engine owns the resulting job.
#[derive(Debug, Clone, Serialize)]
pub struct YamboCalculation {
    /// Main executable (yambo).
    pub code: Code,
    /// Pre-processing executable (p2y).
    pub preprocessing_code: Code,
    /// Remote output folder of the parent calculation.
    pub parent_folder: RemoteFolder,
    /// Calculation input payload.
    pub parameters: Parameters,
    /// Pre-processing parameters.
    pub precode_parameters: serde_json::Map<String, serde_json::Value>,
    /// Plugin behaviour flags.
    pub settings: Settings,
    /// Process metadata.
    pub metadata: Metadata,
}

impl YamboCalculation {
    /// Assemble a request from resolved entities and scheduler options.
    ///
    /// The payloads default to an initialise-only run: empty parameters,
    /// empty pre-processing parameters, `INITIALISE` on, `COPY_DBS` off.
    pub fn new(
        code: Code,
        preprocessing_code: Code,
        parent_folder: RemoteFolder,
        options: SchedulerOptions,
    ) -> Self {
        Self {
            code,
            preprocessing_code,
            parent_folder,
            parameters: Parameters::default(),
            precode_parameters: serde_json::Map::new(),
            settings: Settings::default(),
            metadata: Metadata { options },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Pk;

    fn sample_calc(options: SchedulerOptions) -> YamboCalculation {
        YamboCalculation::new(
            Code::new(1u64, "yambo-5.2@lumi"),
            Code::new(2u64, "p2y-5.2@lumi"),
            RemoteFolder {
                pk: Pk(3),
                remote_path: "/scratch/run/00/1a".into(),
                computer: None,
            },
            options,
        )
    }

    #[test]
    fn test_resources_default() {
        let res = Resources::default();
        assert_eq!(res, Resources::new(1, 1, 1));
    }

    #[test]
    fn test_omp_export() {
        let res = Resources::new(2, 4, 2);
        assert_eq!(res.omp_export(), "export OMP_NUM_THREADS=2");
    }

    #[test]
    fn test_settings_default_flags() {
        let settings = Settings::default();
        assert!(settings.initialise);
        assert!(!settings.copy_dbs);
    }

    #[test]
    fn test_settings_serialized_keys() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains(r#""INITIALISE":true"#));
        assert!(json.contains(r#""COPY_DBS":false"#));
    }

    #[test]
    fn test_optional_fields_absent_when_unset() {
        let calc = sample_calc(SchedulerOptions::new(86400, Resources::default()));
        let json = serde_json::to_string(&calc).unwrap();
        assert!(!json.contains("queue_name"));
        assert!(!json.contains("qos"));
        assert!(!json.contains("account"));
    }

    #[test]
    fn test_queue_name_only() {
        let options = SchedulerOptions::new(86400, Resources::default()).with_queue_name("batch");
        let calc = sample_calc(options);
        let json = serde_json::to_string(&calc).unwrap();
        assert!(json.contains(r#""queue_name":"batch""#));
        assert!(!json.contains("qos"));
        assert!(!json.contains("account"));
    }

    #[test]
    fn test_full_scheduler_options() {
        let options = SchedulerOptions::new(3600, Resources::new(2, 4, 2))
            .with_queue_name("standard-g")
            .with_qos("normal")
            .with_account("project_465000xxx")
            .with_prepend_text(Resources::new(2, 4, 2).omp_export());
        assert_eq!(options.max_wallclock_seconds, 3600);
        assert_eq!(options.resources, Resources::new(2, 4, 2));
        assert_eq!(options.queue_name.as_deref(), Some("standard-g"));
        assert_eq!(options.qos.as_deref(), Some("normal"));
        assert_eq!(options.account.as_deref(), Some("project_465000xxx"));
        assert_eq!(
            options.prepend_text.as_deref(),
            Some("export OMP_NUM_THREADS=2")
        );
    }

    #[test]
    fn test_default_payloads_empty() {
        let calc = sample_calc(SchedulerOptions::new(86400, Resources::default()));
        assert!(calc.parameters.arguments.is_empty());
        assert!(calc.parameters.variables.is_empty());
        assert!(calc.precode_parameters.is_empty());
    }
}
