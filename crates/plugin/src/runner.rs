//! Single-step runner.
//!
//! `TreeRunner` stands in for the host around one node:
//! 1. Builds the node from its definition via the registry.
//! 2. Runs it with a fresh `TreeContext`.
//! 3. On `Suspend`, parks the node and its shared state under the resume URI.
//! 4. On `resume`, re-invokes the parked node with `resumed = true`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use nodes::{Action, AuthNode, Outcome, SharedState, SuspendDirective, TreeContext};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{HostServices, NodeDefinition, NodeRegistry, PluginError};

/// How a step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Completed {
        outcome: Outcome,
        state: SharedState,
    },
    Suspended {
        directive: SuspendDirective,
        state: SharedState,
    },
}

struct PendingStep {
    node_id: String,
    node: Arc<dyn AuthNode>,
    execution_id: Uuid,
    state: SharedState,
    suspended_at: DateTime<Utc>,
}

impl PendingStep {
    fn expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.suspended_at >= ttl
    }
}

/// How long a suspended step waits for its resume by default.
pub const DEFAULT_RESUME_TTL_MINS: i64 = 10;

pub struct TreeRunner {
    registry: NodeRegistry,
    services: HostServices,
    resume_ttl: Duration,
    /// Keyed by resume URI. Expired entries are swept on every suspend.
    pending: Mutex<HashMap<String, PendingStep>>,
}

impl TreeRunner {
    pub fn new(registry: NodeRegistry, services: HostServices) -> Self {
        Self {
            registry,
            services,
            resume_ttl: Duration::minutes(DEFAULT_RESUME_TTL_MINS),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Override how long a suspended step stays resumable.
    pub fn with_resume_ttl(mut self, ttl: Duration) -> Self {
        self.resume_ttl = ttl;
        self
    }

    /// Run `definition` once against `state`.
    #[instrument(skip(self, definition, state), fields(node_id = %definition.id))]
    pub async fn run_step(
        &self,
        definition: &NodeDefinition,
        execution_id: Uuid,
        state: SharedState,
    ) -> Result<StepResult, PluginError> {
        let node = self.registry.build(definition, &self.services)?;
        let ctx = TreeContext::new(execution_id, state);
        self.drive(&definition.id, node, ctx).await
    }

    /// Continue the step suspended under `resume_uri`.
    ///
    /// # Errors
    /// [`PluginError::UnknownResumeToken`] if nothing is waiting on the URI,
    /// including a second resume of the same URI.
    /// [`PluginError::ResumeExpired`] if the step outlived the resume TTL.
    #[instrument(skip_all)]
    pub async fn resume(
        &self,
        resume_uri: &str,
        payload: Option<Value>,
    ) -> Result<StepResult, PluginError> {
        let pending = self
            .pending
            .lock()
            .await
            .remove(resume_uri)
            .ok_or_else(|| PluginError::UnknownResumeToken(resume_uri.to_owned()))?;

        if pending.expired(Utc::now(), self.resume_ttl) {
            warn!(node_id = %pending.node_id, "resume arrived after the step expired");
            return Err(PluginError::ResumeExpired {
                suspended_at: pending.suspended_at,
            });
        }

        info!(
            node_id = %pending.node_id,
            execution_id = %pending.execution_id,
            waited_ms = (Utc::now() - pending.suspended_at).num_milliseconds(),
            "resuming suspended step"
        );

        let ctx = TreeContext::resuming(pending.execution_id, pending.state, payload);
        self.drive(&pending.node_id, pending.node, ctx).await
    }

    /// Number of steps waiting for a resume.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn drive(
        &self,
        node_id: &str,
        node: Arc<dyn AuthNode>,
        mut ctx: TreeContext,
    ) -> Result<StepResult, PluginError> {
        let action = node
            .process(&mut ctx)
            .await
            .map_err(|source| PluginError::Node {
                node_id: node_id.to_owned(),
                source,
            })?;

        match action {
            Action::Goto(outcome) => {
                if !node.outcomes().contains(&outcome) {
                    warn!("node '{}' returned undeclared outcome '{}'", node_id, outcome.as_str());
                }
                info!("node '{}' completed with outcome '{}'", node_id, outcome.as_str());
                Ok(StepResult::Completed {
                    outcome,
                    state: ctx.shared_state,
                })
            }

            Action::Suspend(directive) => {
                info!("node '{}' suspended: {}", node_id, directive.status_message);
                let now = Utc::now();
                let mut pending = self.pending.lock().await;

                let before = pending.len();
                pending.retain(|_, step| !step.expired(now, self.resume_ttl));
                if pending.len() < before {
                    debug!(swept = before - pending.len(), "dropped expired suspended steps");
                }

                pending.insert(
                    directive.resume_uri.clone(),
                    PendingStep {
                        node_id: node_id.to_owned(),
                        node,
                        execution_id: ctx.execution_id,
                        state: ctx.shared_state.clone(),
                        suspended_at: now,
                    },
                );
                Ok(StepResult::Suspended {
                    directive,
                    state: ctx.shared_state,
                })
            }
        }
    }
}
