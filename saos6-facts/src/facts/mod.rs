//! Fact assembly.
//!
//! [`Facts::get_facts`] resolves the requested subsets to collectors, runs
//! them one after another over a [`Cliconf`] and merges what they find into
//! a single [`FactTree`].
//!
//! ```rust,no_run
//! use saos6_facts::{Facts, SubsetRequest};
//! # use saos6_facts::Cliconf;
//!
//! # async fn example(cliconf: &mut impl Cliconf) -> Result<(), saos6_facts::Error> {
//! let facts = Facts::builder().build();
//! let gathered = facts
//!     .get_facts(cliconf, Some(SubsetRequest::new(["config"])), None)
//!     .await?;
//!
//! println!("{}", gathered.facts.get_str("version").unwrap_or("unknown"));
//! for warning in &gathered.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```

mod collector;
mod context;
mod interfaces;
mod legacy;
mod neighbors;
pub mod subset;
mod templates;
mod tree;

pub use collector::{Collector, CollectorRegistry};
pub use context::CollectionContext;
pub use subset::SubsetRequest;
pub use templates::{LLDP_NEIGHBORS, PORT_DETAIL, TemplateSet};
pub use tree::{FactTree, FactValue};

use log::debug;
use serde::Serialize;

use crate::cliconf::Cliconf;
use crate::error::Result;

/// How the interfaces resource is gathered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InterfacesMode {
    /// One `port show port <id>` per listed port, parsed into records.
    #[default]
    Detailed,
    /// Raw `port show` text. Deprecated.
    Summary,
}

/// Facts plus the warnings raised while gathering them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatheredFacts {
    pub facts: FactTree,
    pub warnings: Vec<String>,
}

/// Fact assembler.
#[derive(Debug, Clone)]
pub struct Facts {
    registry: CollectorRegistry,
    templates: TemplateSet,
    default_subset: SubsetRequest,
    default_network_resources: SubsetRequest,
}

impl Facts {
    pub fn builder() -> FactsBuilder {
        FactsBuilder::default()
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// Gather facts.
    ///
    /// `None` uses the configured defaults (`!config` and no resources).
    /// The `default` subset is always gathered. Unknown subset names end up
    /// in [`GatheredFacts::warnings`].
    pub async fn get_facts<C: Cliconf>(
        &self,
        cliconf: &mut C,
        gather_subset: Option<SubsetRequest>,
        gather_network_resources: Option<SubsetRequest>,
    ) -> Result<GatheredFacts> {
        let mut ctx = CollectionContext::new();

        let legacy_names = self.registry.legacy_names();
        let legacy = gather_subset
            .as_ref()
            .unwrap_or(&self.default_subset)
            .resolve(&legacy_names);
        for token in &legacy.unknown {
            ctx.warn(format!(
                "Subset must be one of [{}], got {token}",
                legacy_names.join(", ")
            ));
        }

        let resource_names = self.registry.resource_names();
        let resources = gather_network_resources
            .as_ref()
            .unwrap_or(&self.default_network_resources)
            .resolve(&resource_names);
        for token in &resources.unknown {
            ctx.warn(format!(
                "gather_network_resources must be one of [{}], got {token}",
                resource_names.join(", ")
            ));
        }

        let mut gather_subset = legacy.selected;
        if !gather_subset.contains(&"default") {
            gather_subset.insert(0, "default");
        }

        let mut plan: Vec<Collector> = Vec::new();
        let selected = gather_subset
            .iter()
            .filter_map(|name| self.registry.legacy(name))
            .chain(resources.selected.iter().filter_map(|name| self.registry.resource(name)));
        for collector in selected {
            if !plan.contains(&collector) {
                plan.push(collector);
            }
        }

        let mut facts = FactTree::new();
        for collector in plan {
            debug!("running {} collector", collector.name());
            let found = collector.populate(cliconf, &mut ctx, &self.templates).await?;
            for key in facts.merge(found) {
                debug!("{}: '{key}' already gathered, keeping first value", collector.name());
            }
        }

        facts.insert("gather_subset", to_strings(&gather_subset));
        facts.insert("gather_network_resources", to_strings(&resources.selected));

        Ok(GatheredFacts {
            facts,
            warnings: ctx.into_warnings(),
        })
    }
}

impl Default for Facts {
    fn default() -> Self {
        FactsBuilder::default().build()
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Builder for [`Facts`].
#[derive(Debug, Clone)]
pub struct FactsBuilder {
    default_subset: SubsetRequest,
    default_network_resources: SubsetRequest,
    interfaces_mode: InterfacesMode,
    port_detail_template: Option<String>,
    lldp_neighbors_template: Option<String>,
}

impl Default for FactsBuilder {
    fn default() -> Self {
        Self {
            default_subset: SubsetRequest::new(["!config"]),
            default_network_resources: SubsetRequest::default(),
            interfaces_mode: InterfacesMode::default(),
            port_detail_template: None,
            lldp_neighbors_template: None,
        }
    }
}

impl FactsBuilder {
    /// Subsets gathered when `get_facts` is given no `gather_subset`.
    pub fn default_subset(mut self, request: SubsetRequest) -> Self {
        self.default_subset = request;
        self
    }

    /// Resources gathered when `get_facts` is given no `gather_network_resources`.
    pub fn default_network_resources(mut self, request: SubsetRequest) -> Self {
        self.default_network_resources = request;
        self
    }

    pub fn interfaces_mode(mut self, mode: InterfacesMode) -> Self {
        self.interfaces_mode = mode;
        self
    }

    /// Replace the `port show port <id>` template.
    pub fn port_detail_template(mut self, source: impl Into<String>) -> Self {
        self.port_detail_template = Some(source.into());
        self
    }

    /// Replace the `lldp show neighbors` template.
    pub fn lldp_neighbors_template(mut self, source: impl Into<String>) -> Self {
        self.lldp_neighbors_template = Some(source.into());
        self
    }

    /// Build. A template that fails to load only disables the parse step
    /// that uses it; gathering reports a warning instead.
    pub fn build(self) -> Facts {
        let templates = TemplateSet::load(
            self.port_detail_template.as_deref().unwrap_or(PORT_DETAIL),
            self.lldp_neighbors_template.as_deref().unwrap_or(LLDP_NEIGHBORS),
        );

        Facts {
            registry: CollectorRegistry::new(self.interfaces_mode),
            templates,
            default_subset: self.default_subset,
            default_network_resources: self.default_network_resources,
        }
    }

    /// Build, failing on the first template that does not load.
    pub fn try_build(self) -> Result<Facts> {
        let facts = self.build();
        facts.templates.check()?;
        Ok(facts)
    }
}
