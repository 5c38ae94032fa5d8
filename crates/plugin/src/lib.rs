//! `plugin` crate: registration shim and step runner for the email notify node.
//!
//! [`EmailNotifyPlugin`] advertises the node type per plugin version and
//! registers a factory for it. [`TreeRunner`] plays the host's part for a
//! single step, including suspend/resume correlation.

pub mod models;
pub mod error;
pub mod registry;
pub mod minter;
pub mod runner;

pub use models::NodeDefinition;
pub use error::PluginError;
pub use registry::{EmailNotifyPlugin, HostServices, NodeFactory, NodeRegistry, StartupType, PLUGIN_VERSION};
pub use minter::UrlResumeMinter;
pub use runner::{StepResult, TreeRunner};
