//! Interface macros: `{IPADDRESS}`, `{HOST.IP}`, `{HOST.DNS}`, `{HOST.CONN}`,
//! `{HOST.PORT}`.

use rustc_hash::FxHashMap;

use zmacro_core::constants::UNRESOLVED_MACRO_STRING;
use zmacro_core::errors::SourceError;
use zmacro_core::types::{HostId, InterfaceRow, InterfaceType};
use zmacro_core::DataSource;

use super::{distinct, set, sites_of, EntryValues, Target, TokenSite};
use crate::scanner::{Category, MacroName};

/// How a host's interface is picked for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceSelection {
    /// The main interface with the highest type priority.
    Prioritised,
    /// Only the main agent interface.
    AgentOnly,
    /// The item's own interface, falling back to `Prioritised`.
    ItemOrPrioritised,
}

/// Rewrites interface addresses before they are used as values.
pub type AddressExpander<'a> =
    dyn Fn(Vec<InterfaceRow>) -> Result<Vec<InterfaceRow>, SourceError> + 'a;

/// Highest-priority main interface. Ties go to the lowest interface id so
/// the pick never depends on row order.
pub fn select_main<'a>(
    interfaces: impl IntoIterator<Item = &'a InterfaceRow>,
    only: Option<InterfaceType>,
) -> Option<&'a InterfaceRow> {
    interfaces
        .into_iter()
        .filter(|iface| iface.main)
        .filter(|iface| only.map_or(true, |t| iface.interface_type == t))
        .max_by(|a, b| {
            a.interface_type
                .priority()
                .cmp(&b.interface_type.priority())
                .then_with(|| b.interface_id.cmp(&a.interface_id))
        })
}

pub fn interface_value(name: MacroName, iface: &InterfaceRow) -> Option<String> {
    match name {
        MacroName::IpAddress | MacroName::HostIp => Some(iface.ip.clone()),
        MacroName::HostDns => Some(iface.dns.clone()),
        MacroName::HostConn => Some(iface.conn().to_string()),
        MacroName::HostPort => Some(iface.port.clone()),
        _ => None,
    }
}

fn pick<'a>(
    by_host: &'a FxHashMap<HostId, Vec<InterfaceRow>>,
    target: &Target,
    selection: InterfaceSelection,
) -> Option<&'a InterfaceRow> {
    let interfaces = by_host.get(&target.host_id)?;
    match selection {
        InterfaceSelection::Prioritised => select_main(interfaces, None),
        InterfaceSelection::AgentOnly => select_main(interfaces, Some(InterfaceType::Agent)),
        InterfaceSelection::ItemOrPrioritised => target
            .interface_id
            .and_then(|id| interfaces.iter().find(|iface| iface.interface_id == id))
            .or_else(|| select_main(interfaces, None)),
    }
}

pub fn resolve<S: DataSource + ?Sized>(
    source: &S,
    sites: &[TokenSite],
    selection: InterfaceSelection,
    expand: &AddressExpander<'_>,
    values: &mut [EntryValues],
) -> Result<(), SourceError> {
    let sites = sites_of(sites, Category::Interface);
    if sites.is_empty() {
        return Ok(());
    }

    let host_ids = distinct(sites.iter().map(|site| site.target.host_id));
    let fetched = source.fetch_interfaces(&host_ids)?;
    let mut by_host: FxHashMap<HostId, Vec<InterfaceRow>> = FxHashMap::default();
    for iface in fetched {
        by_host.entry(iface.host_id).or_default().push(iface);
    }

    // Only the picked interfaces need their addresses expanded.
    let picked_ids = distinct(
        sites
            .iter()
            .filter_map(|site| pick(&by_host, &site.target, selection))
            .map(|iface| iface.interface_id),
    );
    let to_expand: Vec<InterfaceRow> = by_host
        .values()
        .flatten()
        .filter(|iface| picked_ids.contains(&iface.interface_id))
        .filter(|iface| iface.ip.contains('{') || iface.dns.contains('{'))
        .cloned()
        .collect();
    if !to_expand.is_empty() {
        for expanded in expand(to_expand)? {
            let (host_id, interface_id) = (expanded.host_id, expanded.interface_id);
            if let Some(slot) = by_host
                .get_mut(&host_id)
                .and_then(|list| list.iter_mut().find(|i| i.interface_id == interface_id))
            {
                *slot = expanded;
            }
        }
    }

    for site in sites {
        let value = pick(&by_host, &site.target, selection)
            .and_then(|iface| interface_value(site.token.name, iface))
            .unwrap_or_else(|| UNRESOLVED_MACRO_STRING.to_string());
        set(values, site, value);
    }
    Ok(())
}
