//! Newtype domain identifiers.
//!
//! Every name that flows from a build notification to a deployment request is
//! represented as a distinct newtype wrapping a `String`. This prevents
//! accidentally passing a [`FunctionName`] where a [`DeploymentGroupName`] is
//! expected, even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers, build side
// ---------------------------------------------------------------------------

/// Name of the build project that produced a notification
/// (e.g. `"build-orders-api"`).
///
/// Deserialised straight from the build event; unlike the other identifiers
/// an empty value is representable here, because the naming convention is
/// checked later by [`crate::target::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Wraps a raw project name.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the project name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

string_id! {
    /// Logical name of the deployable unit, derived from the project name
    /// (`"build-orders-api"` → `"orders-api"`).
    FunctionName
}

// ---------------------------------------------------------------------------
// Identifiers, deployment side
// ---------------------------------------------------------------------------

string_id! {
    /// Name of the deployment application that owns the deployment groups.
    ///
    /// Supplied by process configuration (`DEPLOY_APPLICATION`).
    ApplicationName
}

string_id! {
    /// Named target within the deployment application
    /// (always `"deploy-" + function name`).
    DeploymentGroupName
}

/// Prefix prepended to a function name to form its deployment group name.
pub const DEPLOYMENT_GROUP_PREFIX: &str = "deploy-";

impl DeploymentGroupName {
    /// Returns the deployment group that receives revisions of `function`.
    pub fn for_function(function: &FunctionName) -> Self {
        Self(format!("{DEPLOYMENT_GROUP_PREFIX}{function}"))
    }
}

string_id! {
    /// Object-store bucket that holds deployment manifests (`S3_BUCKET`).
    BucketName
}

string_id! {
    /// Object key of a deployment manifest within [`BucketName`].
    ArtifactKey
}

/// Object-key prefix under which every deployable unit keeps its manifest.
pub const ARTIFACT_PREFIX: &str = "codeDeploy";

/// File name of the deployment manifest inside a unit's artifact directory.
pub const MANIFEST_FILE_NAME: &str = "appspec.yaml";

impl ArtifactKey {
    /// Returns the conventional manifest key for `function`:
    /// `codeDeploy/<function>/appspec.yaml`.
    pub fn manifest_for(function: &FunctionName) -> Self {
        Self(format!("{ARTIFACT_PREFIX}/{function}/{MANIFEST_FILE_NAME}"))
    }
}

string_id! {
    /// Identifier the deployment service assigns to an accepted deployment.
    DeploymentId
}

string_id! {
    /// Correlates all log output of a single handler invocation.
    ///
    /// The Lambda request id when running under the Lambda runtime; a random
    /// UUID for local replays.
    InvocationId
}

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
