//! Node and entity types stored by the workflow engine.
//!
//! Every entity tracked by the engine carries a numeric primary key ([`Pk`]).
//! The adapter only ever reads three kinds of entity: installed executables
//! ([`Code`]), finished calculations ([`ProcessNode`]), and the remote
//! scratch directory a calculation left behind ([`RemoteFolder`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Primary key of a node in the engine's tracking store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pk(pub u64);

impl std::fmt::Display for Pk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Pk {
    fn from(pk: u64) -> Self {
        Self(pk)
    }
}

/// An executable registered with the engine.
///
/// Codes are addressed by label (e.g. `yambo-5.2@lumi`); the engine resolves
/// the label to the installed binary and its host computer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Code {
    /// Primary key of the code node.
    pub pk: Pk,
    /// Full label, `<name>@<computer>`.
    pub label: String,
    /// Host computer the code is installed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer: Option<String>,
}

impl Code {
    /// Create a code reference.
    pub fn new(pk: impl Into<Pk>, label: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            label: label.into(),
            computer: None,
        }
    }

    /// Set the host computer.
    pub fn with_computer(mut self, computer: impl Into<String>) -> Self {
        self.computer = Some(computer.into());
        self
    }
}

/// Remote directory holding the output artifacts of a finished calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFolder {
    /// Primary key of the folder node.
    pub pk: Pk,
    /// Absolute path on the remote computer.
    pub remote_path: String,
    /// Computer the path lives on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer: Option<String>,
}

/// A calculation node, as returned by the engine's node lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessNode {
    /// Primary key of the calculation node.
    pub pk: Pk,
    /// Engine process type string (e.g. `yambo.yambo`).
    #[serde(default)]
    pub process_type: Option<String>,
    /// Time the node was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Output links of the calculation.
    #[serde(default)]
    pub outputs: ProcessOutputs,
}

/// Output links of a calculation node.
///
/// Only the links the adapter consumes are modelled; the engine may attach
/// arbitrary further outputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessOutputs {
    /// The remote scratch directory, present once the calculation ran.
    #[serde(default)]
    pub remote_folder: Option<RemoteFolder>,
}

impl ProcessNode {
    /// The `remote_folder` output, or an error naming the missing link.
    pub fn remote_folder(&self) -> Result<&RemoteFolder, crate::error::EngineError> {
        self.outputs
            .remote_folder
            .as_ref()
            .ok_or_else(|| crate::error::EngineError::MissingOutput {
                pk: self.pk,
                link: "remote_folder".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pk_display() {
        assert_eq!(Pk(42).to_string(), "42");
    }

    #[test]
    fn test_pk_serde_transparent() {
        let json = serde_json::to_string(&Pk(7)).unwrap();
        assert_eq!(json, "7");
        let pk: Pk = serde_json::from_str("7").unwrap();
        assert_eq!(pk, Pk(7));
    }

    #[test]
    fn test_code_builder() {
        let code = Code::new(10u64, "yambo-5.2@lumi").with_computer("lumi");
        assert_eq!(code.pk, Pk(10));
        assert_eq!(code.label, "yambo-5.2@lumi");
        assert_eq!(code.computer.as_deref(), Some("lumi"));
    }

    #[test]
    fn test_process_node_deserialization() {
        let json = r#"{
            "pk": 512,
            "process_type": "quantumespresso.pw",
            "outputs": {
                "remote_folder": {
                    "pk": 513,
                    "remote_path": "/scratch/project/engine_run/51/2f"
                }
            }
        }"#;
        let node: ProcessNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.pk, Pk(512));
        let folder = node.remote_folder().unwrap();
        assert_eq!(folder.pk, Pk(513));
        assert!(folder.remote_path.starts_with("/scratch"));
    }

    #[test]
    fn test_process_node_without_remote_folder() {
        let json = r#"{"pk": 99}"#;
        let node: ProcessNode = serde_json::from_str(json).unwrap();
        let err = node.remote_folder().unwrap_err();
        assert!(err.to_string().contains("remote_folder"));
    }
}
