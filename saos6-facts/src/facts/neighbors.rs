//! LLDP neighbors collector.

use log::debug;

use super::context::CollectionContext;
use super::templates::TemplateSet;
use super::tree::FactTree;
use crate::cliconf::Cliconf;
use crate::error::Result;

pub(crate) const COMMANDS: &[&str] = &["lldp show configuration", "lldp show neighbors"];

/// Marker in `lldp show configuration` output when LLDP is running.
const ENABLED_MARKER: &str = "Enable";

pub(crate) async fn populate<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
    templates: &TemplateSet,
) -> Result<FactTree> {
    let outputs = ctx.run_commands(cliconf, COMMANDS, true).await?;
    let mut facts = FactTree::new();

    if !outputs[0].contains(ENABLED_MARKER) {
        debug!("neighbors: LLDP not enabled");
        return Ok(facts);
    }

    match templates.lldp_neighbors() {
        Ok(template) => {
            facts.insert("neighbors", template.parse_all(&outputs[1]));
        }
        Err(err) => ctx.warn(format!("neighbors: lldp template unusable, skipping: {err}")),
    }
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cliconf::mock::MockCliconf;

    const NEIGHBORS: &str = "\
+--------+-------------------------------------------+
| Local  |             Remote Port                   |
+--------+-------------------------------------------+
| 4      | Chassis Id: 00:02:a1:11:22:33             |
|        | Port Id: 10                               |
|        | Mgmt Addr: 192.0.2.10                     |
|        | System Name: agg-1                        |
+--------+-------------------------------------------+";

    #[tokio::test]
    async fn test_enabled() {
        let mut cliconf = MockCliconf::new()
            .with_output("lldp show configuration", "| Admin State | Enabled |")
            .with_output("lldp show neighbors", NEIGHBORS);
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin()).await.unwrap();
        let records = facts.get("neighbors").and_then(|v| v.as_records()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("localPort"), Some("4"));
        assert_eq!(records[0].get("systemName"), Some("agg-1"));
    }

    #[tokio::test]
    async fn test_disabled_omits_key() {
        let mut cliconf = MockCliconf::new()
            .with_output("lldp show configuration", "| Admin State | Disabled |")
            .with_output("lldp show neighbors", NEIGHBORS);
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin()).await.unwrap();
        assert!(!facts.contains_key("neighbors"));
        assert_eq!(cliconf.count("lldp show neighbors"), 1);
    }

    #[tokio::test]
    async fn test_broken_template_warns() {
        let templates = TemplateSet::load(crate::facts::templates::PORT_DETAIL, "Value x (\\d+)\n");
        let mut cliconf = MockCliconf::new()
            .with_output("lldp show configuration", "Enabled")
            .with_output("lldp show neighbors", NEIGHBORS);
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &templates).await.unwrap();
        assert!(facts.is_empty());
        assert_eq!(ctx.warnings().len(), 1);
    }
}
