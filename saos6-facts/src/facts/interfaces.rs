//! Interfaces collector.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::InterfacesMode;
use super::context::CollectionContext;
use super::templates::TemplateSet;
use super::tree::FactTree;
use crate::cliconf::Cliconf;
use crate::error::Result;

pub(crate) const DETAILED_COMMANDS: &[&str] = &["port show status"];
pub(crate) const SUMMARY_COMMANDS: &[&str] = &["port show"];

/// Port id in the first column of a port table row, e.g. `1`, `1/12`, `2.3`.
static PORT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\|\s*(\d+(?:[/.]\d+)*)\s*\|").expect("valid regex"));

pub(crate) async fn populate<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
    templates: &TemplateSet,
    mode: InterfacesMode,
) -> Result<FactTree> {
    match mode {
        InterfacesMode::Detailed => populate_detailed(cliconf, ctx, templates).await,
        InterfacesMode::Summary => populate_summary(cliconf, ctx).await,
    }
}

async fn populate_detailed<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
    templates: &TemplateSet,
) -> Result<FactTree> {
    let mut facts = FactTree::new();

    let listing = ctx.run_commands(cliconf, DETAILED_COMMANDS, true).await?;
    let ports = parse_port_ids(&listing[0]);
    debug!("interfaces: {} ports listed", ports.len());

    let template = match templates.port_detail() {
        Ok(template) => template,
        Err(err) => {
            ctx.warn(format!("interfaces: port detail template unusable, skipping: {err}"));
            return Ok(facts);
        }
    };

    let commands: Vec<String> = ports.iter().map(|p| format!("port show port {p}")).collect();
    let commands: Vec<&str> = commands.iter().map(String::as_str).collect();
    let details = ctx.run_commands(cliconf, &commands, false).await?;

    let mut records = Vec::with_capacity(ports.len());
    for (port, output) in ports.iter().zip(&details) {
        let Some(mut record) = template.parse_text(output).next() else {
            debug!("interfaces: no detail parsed for port {port}");
            continue;
        };
        if record.get("portName").is_none_or(str::is_empty) {
            record.insert("portName", port.as_str());
        }
        records.push(record);
    }

    facts.insert("interfaces", records);
    Ok(facts)
}

async fn populate_summary<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
) -> Result<FactTree> {
    ctx.warn("interfaces: summary mode is deprecated; `interfaces` holds unparsed `port show` output");
    let mut outputs = ctx.run_commands(cliconf, SUMMARY_COMMANDS, true).await?;

    let mut facts = FactTree::new();
    facts.insert("interfaces", outputs.swap_remove(0));
    Ok(facts)
}

/// Distinct port ids, in listing order.
fn parse_port_ids(listing: &str) -> Vec<String> {
    let mut ports: Vec<String> = Vec::new();
    for caps in PORT_ID.captures_iter(listing) {
        let id = &caps[1];
        if !ports.iter().any(|p| p == id) {
            ports.push(id.to_string());
        }
    }
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cliconf::mock::MockCliconf;

    const PORT_STATUS: &str = "\
+-------+-----+-------+---------+
| Port  | Link| Admin | Mode    |
+-------+-----+-------+---------+
| 1     | Up  | Ena   | 1000/FD |
| 2     | Down| Ena   |         |
| 1     | Up  | Ena   | 1000/FD |
+-------+-----+-------+---------+";

    fn port_detail(port: &str, mac: &str) -> String {
        format!(
            "\
+----------------------------------------------------------------------------+
| Port {port} Info                                                                |
+---------------------------+------------------------+-----------------------+
| Parameter                 | Operational            | Admin                 |
+---------------------------+------------------------+-----------------------+
| Description               | uplink                 |                       |
| Type                      | 10/100/G               |                       |
| Link State                | Up                     | Enabled               |
| MAC Address               | {mac}      |                       |
| Mode                      | 1000/FD                | auto                  |
| Auto Neg                  | On                     | On                    |
| Max Frame Size            | 9216                   | 9216                  |
| Untagged VLAN             | 127                    | 127                   |
+---------------------------+------------------------+-----------------------+"
        )
    }

    #[test]
    fn test_parse_port_ids() {
        assert_eq!(parse_port_ids(PORT_STATUS), vec!["1", "2"]);
        assert_eq!(parse_port_ids("| 1/12 | x |\n| 2.3 | y |"), vec!["1/12", "2.3"]);
        assert!(parse_port_ids("| Port | Link |").is_empty());
    }

    #[test]
    fn test_port_detail_template() {
        let templates = TemplateSet::builtin();
        let template = templates.port_detail().unwrap();
        let records = template.parse_all(&port_detail("1", "AA:BB:CC:DD:EE:FF"));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.get("portName"), Some("1"));
        assert_eq!(record.get("description"), Some("uplink"));
        assert_eq!(record.get("type"), Some("10/100/G"));
        assert_eq!(record.get("linkState"), Some("Up"));
        assert_eq!(record.get("adminState"), Some("Enabled"));
        assert_eq!(record.get("macAddress"), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(record.get("mode"), Some("1000/FD"));
        assert_eq!(record.get("autoNeg"), Some("On"));
        assert_eq!(record.get("maxFrameSize"), Some("9216"));
        assert_eq!(record.get("untaggedVlan"), Some("127"));
    }

    #[test]
    fn test_port_detail_without_heading() {
        let templates = TemplateSet::builtin();
        let template = templates.port_detail().unwrap();
        let table = "\
+---------------------------+------------------------+
| MAC Address               | AA:BB:CC:DD:EE:FF      |
+---------------------------+------------------------+";

        let records = template.parse_all(table);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("macAddress"), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(records[0].get("portName"), Some(""));
    }

    #[tokio::test]
    async fn test_headerless_detail_gets_port_name() {
        let table = "\
+---------------------------+------------------------+
| Link State                | Up                     |
| MAC Address               | AA:BB:CC:DD:EE:FF      |
+---------------------------+------------------------+";
        let mut cliconf = MockCliconf::new()
            .with_output("port show status", "| 7     | Up  | Ena   | 1000/FD |")
            .with_output("port show port 7", table);
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin(), InterfacesMode::Detailed)
            .await
            .unwrap();

        let records = facts.get("interfaces").and_then(|v| v.as_records()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("portName"), Some("7"));
        assert_eq!(records[0].get("linkState"), Some("Up"));
        assert_eq!(records[0].get("macAddress"), Some("AA:BB:CC:DD:EE:FF"));
    }

    #[tokio::test]
    async fn test_one_detail_command_per_port() {
        let mut cliconf = MockCliconf::new()
            .with_output("port show status", PORT_STATUS)
            .with_output("port show port 1", &port_detail("1", "AA:BB:CC:DD:EE:FF"))
            .with_output("port show port 2", &port_detail("2", "AA:BB:CC:DD:EE:FF"));
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin(), InterfacesMode::Detailed)
            .await
            .unwrap();

        let records = facts.get("interfaces").and_then(|v| v.as_records()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.get("macAddress") == Some("AA:BB:CC:DD:EE:FF")));
        assert_eq!(records[1].get("portName"), Some("2"));

        assert_eq!(cliconf.count("port show port 1"), 1);
        assert_eq!(cliconf.count("port show port 2"), 1);
        assert_eq!(cliconf.sent.len(), 3);
    }

    #[tokio::test]
    async fn test_vanished_port_yields_no_record() {
        let mut cliconf = MockCliconf::new()
            .with_output("port show status", PORT_STATUS)
            .with_output("port show port 1", &port_detail("1", "00:11:22:33:44:55"))
            .with_failure("port show port 2", "ERROR: port 2 does not exist");
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin(), InterfacesMode::Detailed)
            .await
            .unwrap();

        let records = facts.get("interfaces").and_then(|v| v.as_records()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("portName"), Some("1"));
    }

    #[tokio::test]
    async fn test_summary_mode_is_raw_and_deprecated() {
        let mut cliconf = MockCliconf::new().with_output("port show", "| 1 | Up |");
        let mut ctx = CollectionContext::new();

        let facts = populate(&mut cliconf, &mut ctx, &TemplateSet::builtin(), InterfacesMode::Summary)
            .await
            .unwrap();

        assert_eq!(facts.get_str("interfaces"), Some("| 1 | Up |"));
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings()[0].contains("deprecated"));
    }
}
