//! Free-standing texts bound to hosts (script confirmations, web scenario
//! names, map labels, screen element URLs...).

use std::collections::BTreeMap;

use tracing::instrument;

use zmacro_core::errors::ResolveError;
use zmacro_core::types::HostId;
use zmacro_core::DataSource;

use super::{Entry, MacroResolver, TextConfig};

impl<S: DataSource + ?Sized> MacroResolver<'_, S> {
    /// Resolve texts grouped by host under a named configuration. The
    /// result has the same shape as the input.
    #[instrument(skip(self, data), fields(hosts = data.len()))]
    pub fn resolve_text(
        &self,
        config: TextConfig,
        data: &BTreeMap<HostId, Vec<String>>,
    ) -> Result<BTreeMap<HostId, Vec<String>>, ResolveError> {
        let entries: Vec<Entry<'_>> = data
            .iter()
            .flat_map(|(host_id, texts)| texts.iter().map(|text| Entry::for_host(text, *host_id)))
            .collect();
        let mut resolved = self
            .resolve_entries(&entries, &config.field_config())?
            .into_iter();

        Ok(data
            .iter()
            .map(|(host_id, texts)| {
                let out: Vec<String> = resolved.by_ref().take(texts.len()).collect();
                (*host_id, out)
            })
            .collect())
    }

    /// Like [`resolve_text`](Self::resolve_text), with the configuration
    /// given by name, e.g. `"scriptConfirmation"`.
    pub fn resolve_text_named(
        &self,
        config_name: &str,
        data: &BTreeMap<HostId, Vec<String>>,
    ) -> Result<BTreeMap<HostId, Vec<String>>, ResolveError> {
        let config: TextConfig = config_name.parse()?;
        self.resolve_text(config, data)
    }
}
