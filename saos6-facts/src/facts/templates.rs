//! Parse templates used by the collectors.

use log::error;

use crate::error::TemplateError;
use crate::template::Template;

/// Built-in template for `port show port <id>`.
pub const PORT_DETAIL: &str = include_str!("../../templates/saos6_port_show_port.textfsm");

/// Built-in template for `lldp show neighbors`.
pub const LLDP_NEIGHBORS: &str = include_str!("../../templates/saos6_lldp_neighbors.textfsm");

/// Loaded templates. A template that failed to load keeps its error so the
/// collector using it can report it.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    port_detail: Result<Template, TemplateError>,
    lldp_neighbors: Result<Template, TemplateError>,
}

impl TemplateSet {
    pub fn load(port_detail: &str, lldp_neighbors: &str) -> Self {
        Self {
            port_detail: load_one("port detail", port_detail),
            lldp_neighbors: load_one("lldp neighbors", lldp_neighbors),
        }
    }

    /// The templates shipped with the crate.
    pub fn builtin() -> Self {
        Self::load(PORT_DETAIL, LLDP_NEIGHBORS)
    }

    pub fn port_detail(&self) -> Result<&Template, &TemplateError> {
        self.port_detail.as_ref()
    }

    pub fn lldp_neighbors(&self) -> Result<&Template, &TemplateError> {
        self.lldp_neighbors.as_ref()
    }

    /// First load error, if any.
    pub fn check(&self) -> Result<(), TemplateError> {
        for template in [&self.port_detail, &self.lldp_neighbors] {
            if let Err(err) = template {
                return Err(err.clone());
            }
        }
        Ok(())
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn load_one(name: &str, source: &str) -> Result<Template, TemplateError> {
    Template::parse(source).inspect_err(|err| error!("{name} template: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_load() {
        let templates = TemplateSet::builtin();
        assert!(templates.check().is_ok());
        assert!(templates.port_detail().is_ok());
        assert!(templates.lldp_neighbors().is_ok());
    }

    #[test]
    fn test_broken_template_kept_as_error() {
        let templates = TemplateSet::load(PORT_DETAIL, "Value x (\\d+)\n\nStart\n  ^x ${x} -> Nowhere\n");
        assert!(templates.port_detail().is_ok());
        assert!(matches!(
            templates.lldp_neighbors(),
            Err(TemplateError::UndefinedState { .. })
        ));
        assert!(templates.check().is_err());
    }
}
