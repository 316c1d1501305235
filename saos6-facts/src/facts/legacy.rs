//! Default and Config collectors.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::context::CollectionContext;
use super::tree::FactTree;
use crate::cliconf::Cliconf;
use crate::error::Result;

pub(crate) const DEFAULT_COMMANDS: &[&str] = &["chassis show device-id"];
pub(crate) const CONFIG_COMMANDS: &[&str] = &["conf show brief"];

/// Device-info fields copied into the tree, by short name.
const PLATFORM_FACTS: &[&str] = &["model", "image", "version", "platform", "hostname"];

static SERIAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\| Serial Number +\| +(\S+)").expect("valid regex"));

/// Serial number plus the platform facts from the device capabilities, and
/// the version of this crate under `collector_version`.
pub(crate) async fn populate_default<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
) -> Result<FactTree> {
    let outputs = ctx.run_commands(cliconf, DEFAULT_COMMANDS, true).await?;
    let mut facts = FactTree::new();

    match parse_serialnum(&outputs[0]) {
        Some(serial) => {
            facts.insert("serialnum", serial);
        }
        None => debug!("default: no serial number in device-id output"),
    }

    let capabilities = cliconf.get_capabilities().await?;
    let info = &capabilities.device_info;

    if !info.network_os.is_empty() {
        facts.insert("system", info.network_os.as_str());
    }
    for &item in PLATFORM_FACTS {
        if let Some(value) = info.get(item).filter(|v| !v.is_empty()) {
            facts.insert(item, value);
        }
    }
    if !capabilities.network_api.is_empty() {
        facts.insert("api", capabilities.network_api.as_str());
    }
    facts.insert("collector_version", env!("CARGO_PKG_VERSION"));

    Ok(facts)
}

/// Raw configuration text under `config`.
pub(crate) async fn populate_config<C: Cliconf>(
    cliconf: &mut C,
    ctx: &mut CollectionContext,
) -> Result<FactTree> {
    let mut outputs = ctx.run_commands(cliconf, CONFIG_COMMANDS, true).await?;
    let mut facts = FactTree::new();
    facts.insert("config", outputs.swap_remove(0));
    Ok(facts)
}

fn parse_serialnum(text: &str) -> Option<String> {
    SERIAL_NUMBER.captures(text).map(|caps| caps[1].to_string())
}
