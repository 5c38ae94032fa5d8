//! Node registry and the plugin registration shim.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use mailer::MailTransport;
use nodes::email_notify::NODE_TYPE;
use nodes::{AuthNode, EmailNotifyNode, IdentityRepository, NodeError, SuspensionHost};
use serde_json::Value;
use tracing::info;

use crate::{NodeDefinition, PluginError};

/// Current plugin version. Bump when the node's config or outcomes change.
pub const PLUGIN_VERSION: &str = "1.0.5";

// ---------------------------------------------------------------------------
// Host services
// ---------------------------------------------------------------------------

/// Host collaborators handed to every node a factory builds.
#[derive(Clone)]
pub struct HostServices {
    pub identities: Arc<dyn IdentityRepository>,
    pub transport: Arc<dyn MailTransport>,
    pub suspension: Arc<dyn SuspensionHost>,
}

// ---------------------------------------------------------------------------
// Node registry
// ---------------------------------------------------------------------------

/// Builds a node instance from its JSON config.
pub type NodeFactory =
    Arc<dyn Fn(&Value, &HostServices) -> Result<Arc<dyn AuthNode>, NodeError> + Send + Sync>;

/// Maps `node_type` strings to factories.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node_type: impl Into<String>, factory: NodeFactory) {
        self.factories.insert(node_type.into(), factory);
    }

    /// Instantiate the node described by `definition`.
    pub fn build(
        &self,
        definition: &NodeDefinition,
        services: &HostServices,
    ) -> Result<Arc<dyn AuthNode>, PluginError> {
        let factory = self
            .factories
            .get(&definition.node_type)
            .ok_or_else(|| PluginError::UnknownNodeType(definition.node_type.clone()))?;

        (factory.as_ref())(&definition.config, services).map_err(|source| PluginError::Node {
            node_id: definition.id.clone(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Why the host is starting the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupType {
    FirstTimeInstall,
    Normal,
    Upgrade,
}

/// Registration shim for [`EmailNotifyNode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailNotifyPlugin;

impl EmailNotifyPlugin {
    /// Node types provided, keyed by the plugin version that introduced them.
    pub fn nodes_by_version(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        BTreeMap::from([(PLUGIN_VERSION, vec![NODE_TYPE])])
    }

    /// Called once, the first time the host sees this plugin.
    pub fn on_install(&self) -> Result<(), PluginError> {
        info!(version = PLUGIN_VERSION, "installing email notify plugin");
        Ok(())
    }

    /// Called on every host start, after install/upgrade.
    pub fn on_startup(&self, startup: StartupType) -> Result<(), PluginError> {
        info!(version = PLUGIN_VERSION, ?startup, "starting email notify plugin");
        Ok(())
    }

    /// Called when the installed version is older than [`PLUGIN_VERSION`].
    pub fn upgrade(&self, from_version: &str) -> Result<(), PluginError> {
        let from = parse_version(from_version)?;
        let current = parse_version(PLUGIN_VERSION)?;

        if from > current {
            return Err(PluginError::Downgrade {
                from: from_version.to_owned(),
                current: PLUGIN_VERSION.to_owned(),
            });
        }

        info!(from = from_version, to = PLUGIN_VERSION, "upgrading email notify plugin");
        Ok(())
    }

    /// Install a factory for every node type this plugin provides.
    pub fn register(&self, registry: &mut NodeRegistry) {
        let factory: NodeFactory = Arc::new(|config: &Value, services: &HostServices| {
            let node = EmailNotifyNode::from_value(
                config.clone(),
                services.identities.clone(),
                services.transport.clone(),
                services.suspension.clone(),
            )?;
            Ok(Arc::new(node) as Arc<dyn AuthNode>)
        });
        registry.register(NODE_TYPE, factory);
    }
}

fn parse_version(version: &str) -> Result<Vec<u32>, PluginError> {
    version
        .split('.')
        .map(|part| part.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| PluginError::InvalidVersion(version.to_owned()))
}
