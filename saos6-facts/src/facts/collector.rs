//! Collector variants and the subset-name registry.

use indexmap::IndexMap;

use super::context::CollectionContext;
use super::templates::TemplateSet;
use super::tree::FactTree;
use super::{InterfacesMode, interfaces, legacy, neighbors};
use crate::cliconf::Cliconf;
use crate::error::Result;

/// One unit of fact gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    /// Serial number and device info.
    Default,
    /// Raw running configuration.
    Config,
    /// Per-port records (or raw text in summary mode).
    Interfaces(InterfacesMode),
    /// LLDP neighbor records.
    Neighbors,
}

impl Collector {
    pub fn name(&self) -> &'static str {
        match self {
            Collector::Default => "default",
            Collector::Config => "config",
            Collector::Interfaces(_) => "interfaces",
            Collector::Neighbors => "neighbors",
        }
    }

    /// Commands issued up front. Detailed interfaces also issue one
    /// `port show port <id>` per listed port.
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            Collector::Default => legacy::DEFAULT_COMMANDS,
            Collector::Config => legacy::CONFIG_COMMANDS,
            Collector::Interfaces(InterfacesMode::Detailed) => interfaces::DETAILED_COMMANDS,
            Collector::Interfaces(InterfacesMode::Summary) => interfaces::SUMMARY_COMMANDS,
            Collector::Neighbors => neighbors::COMMANDS,
        }
    }

    /// Run the collector and return the facts it found.
    pub async fn populate<C: Cliconf>(
        &self,
        cliconf: &mut C,
        ctx: &mut CollectionContext,
        templates: &TemplateSet,
    ) -> Result<FactTree> {
        match *self {
            Collector::Default => legacy::populate_default(cliconf, ctx).await,
            Collector::Config => legacy::populate_config(cliconf, ctx).await,
            Collector::Interfaces(mode) => interfaces::populate(cliconf, ctx, templates, mode).await,
            Collector::Neighbors => neighbors::populate(cliconf, ctx, templates).await,
        }
    }
}

/// Maps subset names to collectors.
///
/// Legacy subsets come from `gather_subset`, resource subsets from
/// `gather_network_resources`. A name may appear in both.
#[derive(Debug, Clone)]
pub struct CollectorRegistry {
    legacy: IndexMap<&'static str, Collector>,
    resources: IndexMap<&'static str, Collector>,
}

impl CollectorRegistry {
    pub fn new(interfaces_mode: InterfacesMode) -> Self {
        let legacy = [Collector::Default, Collector::Config, Collector::Neighbors];
        let resources = [Collector::Interfaces(interfaces_mode), Collector::Neighbors];

        Self {
            legacy: legacy.into_iter().map(|c| (c.name(), c)).collect(),
            resources: resources.into_iter().map(|c| (c.name(), c)).collect(),
        }
    }

    pub fn legacy_names(&self) -> Vec<&'static str> {
        self.legacy.keys().copied().collect()
    }

    pub fn resource_names(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn legacy(&self, name: &str) -> Option<Collector> {
        self.legacy.get(name).copied()
    }

    pub fn resource(&self, name: &str) -> Option<Collector> {
        self.resources.get(name).copied()
    }
}

impl Default for CollectorRegistry {
    fn default() -> Self {
        Self::new(InterfacesMode::default())
    }
}
