//! Execution of kubectl commands inside a managed cluster through the
//! cluster's run-command API, for callers without direct API access.

use std::fmt;

use log::debug;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::{CallContext, CommandExecutor, ToolError};
use crate::eval::AuthorizedCommand;
use crate::parse::CommandType;

const AKS_PROVIDER: &str = "Microsoft.ContainerService";
const AKS_RESOURCE_TYPE: &str = "managedClusters";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    #[error("resource ID cannot be empty")]
    Empty,
    #[error("invalid resource ID format: {0}")]
    InvalidFormat(String),
    #[error("resource ID is not an AKS cluster: {0}")]
    NotAksCluster(String),
}

/// Components of a managed-cluster resource ID:
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.ContainerService/managedClusters/{name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AksResourceId {
    pub subscription_id: String,
    pub resource_group: String,
    pub cluster_name: String,
}

impl AksResourceId {
    pub fn parse(resource_id: &str) -> Result<Self, ResourceIdError> {
        let resource_id = resource_id.trim();
        if resource_id.is_empty() {
            return Err(ResourceIdError::Empty);
        }

        let segments: Vec<&str> = resource_id.split('/').collect();
        let invalid = || ResourceIdError::InvalidFormat(resource_id.to_string());
        if segments.len() < 9
            || !segments[0].is_empty()
            || segments[1] != "subscriptions"
            || segments[3] != "resourceGroups"
            || segments[5] != "providers"
        {
            return Err(invalid());
        }
        if segments[6] != AKS_PROVIDER || segments[7] != AKS_RESOURCE_TYPE {
            return Err(ResourceIdError::NotAksCluster(resource_id.to_string()));
        }
        if segments[2].is_empty() || segments[4].is_empty() || segments[8].is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            subscription_id: segments[2].to_string(),
            resource_group: segments[4].to_string(),
            cluster_name: segments[8].to_string(),
        })
    }
}

impl fmt::Display for AksResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.cluster_name)
    }
}

/// Credentials and target cluster for one run-command call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub azure_token: String,
    pub cluster: AksResourceId,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequestContext {
    #[serde(default)]
    azure_token: String,
    #[serde(default)]
    subscription_id: String,
    #[serde(default)]
    resource_group: String,
    #[serde(default)]
    cluster_name: String,
}

impl RequestContext {
    /// Build from the call context.
    ///
    /// The token comes from the serialized request context. The cluster comes
    /// from the request context when it names one completely, otherwise from
    /// the `aks_resource_id` tool argument.
    pub fn extract(context: &CallContext) -> Result<Self, ToolError> {
        let raw: RawRequestContext = match context.request_context.as_deref() {
            Some(s) if !s.is_empty() => serde_json::from_str(s).map_err(|e| {
                ToolError::RequestContext(format!("failed to unmarshal request_context: {e}"))
            })?,
            _ => RawRequestContext::default(),
        };
        if raw.azure_token.is_empty() {
            return Err(ToolError::RequestContext(
                "azure_token not found in request context or empty".into(),
            ));
        }

        let cluster = if !raw.subscription_id.is_empty()
            && !raw.resource_group.is_empty()
            && !raw.cluster_name.is_empty()
        {
            AksResourceId {
                subscription_id: raw.subscription_id,
                resource_group: raw.resource_group,
                cluster_name: raw.cluster_name,
            }
        } else {
            let resource_id = match context.arguments.get("aks_resource_id") {
                Some(Value::String(s)) if !s.is_empty() => s,
                _ => {
                    return Err(ToolError::RequestContext(
                        "aks_resource_id not found in params or empty".into(),
                    ));
                }
            };
            AksResourceId::parse(resource_id).map_err(|e| {
                ToolError::RequestContext(format!("failed to parse aks_resource_id: {e}"))
            })?
        };

        Ok(Self {
            azure_token: raw.azure_token,
            cluster,
        })
    }
}

/// Final state of a run-command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunCommandOutput {
    pub logs: String,
    pub exit_code: Option<i32>,
}

/// Submits a command string to a cluster's run-command API and waits for it.
pub trait RunCommandClient: Send + Sync {
    fn run(&self, context: &RequestContext, command: &str) -> Result<RunCommandOutput, String>;
}

/// Executes authorized kubectl commands through a [`RunCommandClient`].
pub struct RunCommandExecutor<C> {
    client: C,
}

impl<C: RunCommandClient> RunCommandExecutor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: RunCommandClient> CommandExecutor for RunCommandExecutor<C> {
    fn execute(&self, command: &AuthorizedCommand, context: &CallContext) -> Result<String, ToolError> {
        if command.command_type() != CommandType::Kubectl {
            return Err(ToolError::InvalidArguments(format!(
                "run-command executes kubectl only, got {}",
                command.command_type()
            )));
        }

        let request = RequestContext::extract(context)?;
        debug!("run-command on cluster {}", request.cluster);

        let argv = std::iter::once("kubectl").chain(command.argv().iter().map(String::as_str));
        let line = shlex::try_join(argv).map_err(|e| {
            ToolError::InvalidArguments(format!("command cannot be quoted: {e}"))
        })?;

        let output = self.client.run(&request, &line).map_err(|e| ToolError::Execution {
            message: format!(
                "failed to execute command '{line}' on cluster {}: {e}",
                request.cluster
            ),
            output: String::new(),
        })?;

        match output.exit_code {
            Some(code) if code != 0 => Err(ToolError::Execution {
                message: format!(
                    "command '{line}' on cluster {} failed with exit code {code}",
                    request.cluster
                ),
                output: output.logs,
            }),
            _ => Ok(output.logs),
        }
    }
}
