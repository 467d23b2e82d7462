//! Error taxonomy for scene construction and runtime orchestration.

use thiserror::Error;

/// Errors surfaced by scene authoring and the simulation/visualization
/// lifecycle.
///
/// All of these are reported synchronously at the call that triggered
/// them; nothing is retried or swallowed internally. Construction errors
/// leave no partially-built object behind, and lifecycle errors leave
/// existing state untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    /// Malformed kinematic tree (missing root, absent parent, ...).
    #[error("invalid topology: {reason}")]
    InvalidTopology {
        /// What made the tree invalid.
        reason: String,
    },

    /// Name collision in a registry.
    #[error("duplicate name: {name}")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },

    /// Requested backend is not part of the supported set.
    #[error("unsupported backend: {name}")]
    UnsupportedBackend {
        /// The unknown backend name.
        name: String,
    },

    /// The backend cannot represent a requested shape/joint combination.
    #[error("backend rejected scene: {reason}")]
    BackendRejected {
        /// What the backend could not represent.
        reason: String,
    },

    /// A resource that admits one live instance already has one.
    #[error("already bound: {resource}")]
    AlreadyBound {
        /// The doubly-claimed resource.
        resource: String,
    },

    /// Operation invoked before the required initialization.
    #[error("not ready: {operation} requires an initialized instance")]
    NotReady {
        /// The operation that was attempted too early.
        operation: String,
    },

    /// Shape descriptor failed validation.
    #[error("invalid shape: {reason}")]
    InvalidShape {
        /// What is wrong with the descriptor.
        reason: String,
    },

    /// Action vector length disagrees with the agent's action dimension.
    #[error("action size mismatch for agent {agent}: expected {expected}, got {actual}")]
    ActionSizeMismatch {
        /// Target agent.
        agent: String,
        /// The agent's fixed action dimension.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Body name not present in the simulation.
    #[error("body not found: {name}")]
    BodyNotFound {
        /// Name of the missing body.
        name: String,
    },

    /// Agent name not present in the scenario.
    #[error("agent not found: {name}")]
    AgentNotFound {
        /// Name of the missing agent.
        name: String,
    },
}

impl SceneError {
    /// Create an invalid-topology error.
    #[must_use]
    pub fn invalid_topology(reason: impl Into<String>) -> Self {
        Self::InvalidTopology {
            reason: reason.into(),
        }
    }

    /// Create a duplicate-name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an unsupported-backend error.
    #[must_use]
    pub fn unsupported_backend(name: impl Into<String>) -> Self {
        Self::UnsupportedBackend { name: name.into() }
    }

    /// Create a backend-rejected error.
    #[must_use]
    pub fn backend_rejected(reason: impl Into<String>) -> Self {
        Self::BackendRejected {
            reason: reason.into(),
        }
    }

    /// Create an already-bound error.
    #[must_use]
    pub fn already_bound(resource: impl Into<String>) -> Self {
        Self::AlreadyBound {
            resource: resource.into(),
        }
    }

    /// Create a not-ready error.
    #[must_use]
    pub fn not_ready(operation: impl Into<String>) -> Self {
        Self::NotReady {
            operation: operation.into(),
        }
    }

    /// Create an invalid-shape error.
    #[must_use]
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if this is a not-ready error.
    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    /// Check if this is a duplicate-name error.
    #[must_use]
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, Self::DuplicateName { .. })
    }

    /// Check if this is an invalid-topology error.
    #[must_use]
    pub fn is_invalid_topology(&self) -> bool {
        matches!(self, Self::InvalidTopology { .. })
    }

    /// Check if this is an already-bound error.
    #[must_use]
    pub fn is_already_bound(&self) -> bool {
        matches!(self, Self::AlreadyBound { .. })
    }
}
