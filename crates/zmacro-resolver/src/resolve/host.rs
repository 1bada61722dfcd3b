//! Host identity macros: `{HOSTNAME}`, `{HOST.HOST}`, `{HOST.NAME}`, `{HOST.ID}`.

use rustc_hash::FxHashMap;

use zmacro_core::constants::UNRESOLVED_MACRO_STRING;
use zmacro_core::errors::SourceError;
use zmacro_core::types::{HostId, HostRow};
use zmacro_core::DataSource;

use super::{distinct, set, sites_of, EntryValues, TokenSite};
use crate::scanner::{Category, MacroName};

pub fn host_value(name: MacroName, host: &HostRow) -> Option<String> {
    match name {
        MacroName::Hostname | MacroName::HostHost => Some(host.host.clone()),
        MacroName::HostName => Some(host.name.clone()),
        MacroName::HostId => Some(host.host_id.to_string()),
        _ => None,
    }
}

pub fn resolve<S: DataSource + ?Sized>(
    source: &S,
    sites: &[TokenSite],
    values: &mut [EntryValues],
) -> Result<(), SourceError> {
    let sites = sites_of(sites, Category::Host);
    if sites.is_empty() {
        return Ok(());
    }

    let host_ids = distinct(sites.iter().map(|site| site.target.host_id));
    let hosts: FxHashMap<HostId, HostRow> = source
        .fetch_hosts(&host_ids)?
        .into_iter()
        .map(|host| (host.host_id, host))
        .collect();

    for site in sites {
        let value = hosts
            .get(&site.target.host_id)
            .and_then(|host| host_value(site.token.name, host))
            .unwrap_or_else(|| UNRESOLVED_MACRO_STRING.to_string());
        set(values, site, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use zmacro_core::MemorySource;

    use super::*;
    use crate::resolve::Target;
    use crate::scanner::MacroToken;

    fn site(entry: usize, name: MacroName, slot: u8, host: u64) -> TokenSite {
        TokenSite {
            entry,
            token: MacroToken::new(name, slot),
            target: Target::host(HostId(host)),
        }
    }

    #[test]
    fn test_host_and_name_variants() {
        let source = MemorySource::new().with_host(1, "web01", "Web server");
        let sites = [
            site(0, MacroName::HostHost, 0, 1),
            site(0, MacroName::HostName, 2, 1),
            site(0, MacroName::Hostname, 0, 1),
            site(0, MacroName::HostId, 0, 1),
        ];
        let mut values = vec![EntryValues::default()];
        resolve(&source, &sites, &mut values).unwrap();
        assert_eq!(values[0]["{HOST.HOST}"], "web01");
        assert_eq!(values[0]["{HOST.NAME2}"], "Web server");
        assert_eq!(values[0]["{HOSTNAME}"], "web01");
        assert_eq!(values[0]["{HOST.ID}"], "1");
        assert_eq!(source.calls().hosts, 1);
    }

    #[test]
    fn test_missing_host_is_unresolved() {
        let source = MemorySource::new();
        let mut values = vec![EntryValues::default()];
        resolve(&source, &[site(0, MacroName::HostName, 0, 9)], &mut values).unwrap();
        assert_eq!(values[0]["{HOST.NAME}"], "*UNKNOWN*");
    }
}
