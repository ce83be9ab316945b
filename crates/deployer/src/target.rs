//! Derivation of the deployment target from a build project name.
//!
//! Build projects are named `<anything>build-<function>`. The deployable unit
//! is everything after the *first* `build-` marker, kept verbatim even when it
//! contains further `build-` literals.

use crate::{DeploymentGroupName, ExtractionError, FunctionName, ProjectName};

/// Marker separating the build-project prefix from the function name.
pub const BUILD_MARKER: &str = "build-";

/// Names the deployment service addresses for one deployable unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentTarget {
    /// Logical function name (`"orders-api"`).
    pub function_name: FunctionName,
    /// Deployment group receiving the function's revisions
    /// (`"deploy-orders-api"`).
    pub deployment_group_name: DeploymentGroupName,
}

/// Resolves the deployment target for `project`.
///
/// # Errors
///
/// - [`ExtractionError::MissingBuildMarker`] if `project` contains no
///   `build-` marker.
/// - [`ExtractionError::EmptyFunctionName`] if nothing follows the marker.
pub fn resolve(project: &ProjectName) -> Result<DeploymentTarget, ExtractionError> {
    let (_, remainder) = project.as_str().split_once(BUILD_MARKER).ok_or_else(|| {
        ExtractionError::MissingBuildMarker {
            project_name: project.clone(),
        }
    })?;

    let function_name =
        FunctionName::new(remainder).ok_or_else(|| ExtractionError::EmptyFunctionName {
            project_name: project.clone(),
        })?;

    Ok(DeploymentTarget {
        deployment_group_name: DeploymentGroupName::for_function(&function_name),
        function_name,
    })
}
