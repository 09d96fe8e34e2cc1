//! Error types for utilize-core

use crate::backend::BackendError;
use crate::lifecycle::ProcessRole;
use crate::resource::ResourceKind;

/// Result type for utilize-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving or building resources
///
/// Configuration errors are never retried and never defaulted past an
/// explicit engine selection; the failing slot stays unbuilt.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured engine name is not in the resource's decision table
    #[error("Unsupported {resource} engine '{engine}'")]
    UnsupportedEngine {
        resource: ResourceKind,
        engine: String,
    },

    /// A selected engine needs a parameter the configuration lacks
    #[error("{resource} engine '{engine}' requires `{key}`")]
    MissingParameter {
        resource: ResourceKind,
        engine: String,
        key: String,
    },

    #[error("Invalid value '{value}' for [{section}] {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown parameter `{key}` in [{section}]")]
    UnknownParameter { section: String, key: String },

    #[error("{resource} requested before a process role was declared")]
    RoleNotDeclared { resource: ResourceKind },

    #[error("{resource} must not be built in a supervisor process; declare a worker role after forking")]
    SupervisorProcess { resource: ResourceKind },

    #[error("{resource} requested in process {current} but the role was declared in process {declared}")]
    ForkedProcess {
        resource: ResourceKind,
        declared: u32,
        current: u32,
    },

    #[error("Process {current} inherited resources built by process {declared}; create a fresh registry after forking")]
    InheritedResources { declared: u32, current: u32 },

    #[error("Cannot change process role from {from} to {to} once stateful resources are built")]
    RoleLocked { from: ProcessRole, to: ProcessRole },

    #[error("{resource} requested after the registry was shut down")]
    ShutDown { resource: ResourceKind },

    /// An initialization statement failed; the batch was rolled back
    #[error("Initialization statement `{key}` failed for {resource}: {source}")]
    InitStatement {
        resource: ResourceKind,
        key: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to seed key `{key}`: {source}")]
    Seed {
        key: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to build {resource}: {source}")]
    Backend {
        resource: ResourceKind,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Config(#[from] utilize_config::Error),
}

impl Error {
    pub(crate) fn backend(resource: ResourceKind) -> impl FnOnce(BackendError) -> Self {
        move |source| Self::Backend { resource, source }
    }

    pub(crate) fn invalid(
        section: &str,
        key: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error comes from the configuration rather than from a
    /// collaborator or the process lifecycle.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEngine { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidValue { .. }
                | Self::UnknownParameter { .. }
                | Self::Config(_)
        )
    }
}
