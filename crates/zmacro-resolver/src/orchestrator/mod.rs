//! Orchestrator: composes scanning, value resolution and substitution per
//! field kind.
//!
//! Every public entry point takes a whole batch and resolves all macro
//! categories of the batch in one pass: tokens are scanned, bound to their
//! targets, resolved category by category with bulk queries, merged per
//! entry, and only then substituted. Inputs are never mutated.

pub mod config;
mod expression;
mod item;
mod text;
mod trigger;

pub use config::{FieldConfig, TextConfig};
pub use expression::{ExpressionOptions, ExpressionPart, FunctionCall, ResolvedExpression};
pub use trigger::NameOptions;

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

use zmacro_core::config::ResolverConfig;
use zmacro_core::errors::SourceError;
use zmacro_core::types::{FunctionId, FunctionRow, HostId, InterfaceRow, TriggerId};
use zmacro_core::DataSource;

use crate::expression::FunctionIndex;
use crate::resolve::item::{EventTime, ItemValueOptions};
use crate::resolve::user::UserMacroRequest;
use crate::resolve::{self, distinct, EntryValues, Target, TokenSite};
use crate::scanner::{self, Category, MacroName};
use crate::substitute::{References, Substitution};

/// How the built-in tokens of an entry find their target.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    Unbound,
    /// Through the function slots of a trigger expression.
    Slots(FunctionIndex),
    Fixed(Target),
}

/// Hosts the user macros of an entry are looked up on.
#[derive(Debug, Clone)]
pub(crate) enum HostScope {
    /// The hosts the trigger monitors.
    Trigger(TriggerId),
    Hosts(SmallVec<[HostId; 2]>),
}

/// One text to resolve within a batch.
#[derive(Debug, Clone)]
pub(crate) struct Entry<'t> {
    text: &'t str,
    binding: Binding,
    scope: HostScope,
    trigger_id: Option<TriggerId>,
    event: Option<EventTime>,
    references: Option<References>,
}

impl<'t> Entry<'t> {
    pub(crate) fn new(text: &'t str, binding: Binding, scope: HostScope) -> Self {
        Self {
            text,
            binding,
            scope,
            trigger_id: None,
            event: None,
            references: None,
        }
    }

    /// A text bound directly to one host.
    pub(crate) fn for_host(text: &'t str, host_id: HostId) -> Self {
        Self::new(
            text,
            Binding::Fixed(Target::host(host_id)),
            HostScope::Hosts(SmallVec::from_elem(host_id, 1)),
        )
    }

    pub(crate) fn with_trigger(mut self, trigger_id: TriggerId) -> Self {
        self.trigger_id = Some(trigger_id);
        self
    }

    pub(crate) fn with_event(mut self, event: EventTime) -> Self {
        self.event = Some(event);
        self
    }

    pub(crate) fn with_references(mut self, references: Option<References>) -> Self {
        self.references = references;
        self
    }
}

/// Batch macro resolver over a data source.
pub struct MacroResolver<'a, S: DataSource + ?Sized> {
    source: &'a S,
    config: ResolverConfig,
    now: i64,
}

impl<'a, S: DataSource + ?Sized> MacroResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: ResolverConfig::default(),
            now: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin "now" (unix seconds) for the history lookback window.
    pub fn at_time(mut self, now: i64) -> Self {
        self.now = now;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn history_since(&self) -> i64 {
        let period = i64::try_from(self.config.effective_history_period()).unwrap_or(i64::MAX);
        self.now.saturating_sub(period)
    }

    fn fetch_functions(
        &self,
        function_ids: Vec<FunctionId>,
    ) -> Result<FxHashMap<FunctionId, FunctionRow>, SourceError> {
        if function_ids.is_empty() {
            return Ok(FxHashMap::default());
        }
        Ok(self
            .source
            .fetch_functions(&function_ids)?
            .into_iter()
            .map(|f| (f.function_id, f))
            .collect())
    }

    fn fetch_trigger_hosts(
        &self,
        trigger_ids: Vec<TriggerId>,
    ) -> Result<FxHashMap<TriggerId, Vec<HostId>>, SourceError> {
        let mut by_trigger: FxHashMap<TriggerId, Vec<HostId>> = FxHashMap::default();
        if trigger_ids.is_empty() {
            return Ok(by_trigger);
        }
        for row in self.source.fetch_trigger_hosts(&trigger_ids)? {
            by_trigger.entry(row.trigger_id).or_default().push(row.host_id);
        }
        Ok(by_trigger)
    }

    /// Expand host and user macros inside interface addresses.
    fn expand_interfaces(
        &self,
        mut interfaces: Vec<InterfaceRow>,
    ) -> Result<Vec<InterfaceRow>, SourceError> {
        let resolved = {
            let entries: Vec<Entry<'_>> = interfaces
                .iter()
                .flat_map(|iface| {
                    [
                        Entry::for_host(&iface.ip, iface.host_id),
                        Entry::for_host(&iface.dns, iface.host_id),
                    ]
                })
                .collect();
            let config = TextConfig::HostInterfaceIpDnsAgentPrimary.field_config();
            self.resolve_entries(&entries, &config)?
        };
        let mut resolved = resolved.into_iter();
        for iface in &mut interfaces {
            if let (Some(ip), Some(dns)) = (resolved.next(), resolved.next()) {
                iface.ip = ip;
                iface.dns = dns;
            }
        }
        Ok(interfaces)
    }

    /// Resolve a batch of entries under one field configuration. The
    /// result is index-aligned with `entries`.
    pub(crate) fn resolve_entries(
        &self,
        entries: &[Entry<'_>],
        config: &FieldConfig,
    ) -> Result<Vec<String>, SourceError> {
        let filter = config.filter();
        let scanned: Vec<Vec<scanner::MacroToken>> = entries
            .iter()
            .map(|entry| scanner::tokens(entry.text, filter))
            .collect();

        let slot_functions = distinct(entries.iter().zip(&scanned).flat_map(|(entry, tokens)| {
            let index = match &entry.binding {
                Binding::Slots(index) => Some(index),
                _ => None,
            };
            tokens
                .iter()
                .filter(|token| token.name.category() != Category::Trigger)
                .filter_map(move |token| index.and_then(|index| index.get(token.slot)))
        }));
        let functions = self.fetch_functions(slot_functions)?;

        let mut values = vec![EntryValues::default(); entries.len()];
        let mut sites = Vec::new();
        for (i, (entry, tokens)) in entries.iter().zip(&scanned).enumerate() {
            for token in tokens {
                if token.name.category() == Category::Trigger {
                    if let (MacroName::TriggerId, Some(id)) = (token.name, entry.trigger_id) {
                        values[i].insert(token.literal(), id.to_string());
                    }
                    continue;
                }
                let target = match &entry.binding {
                    Binding::Unbound => None,
                    Binding::Fixed(target) => Some(*target),
                    Binding::Slots(index) => index
                        .get(token.slot)
                        .and_then(|id| functions.get(&id))
                        .map(|f| Target {
                            host_id: f.host_id,
                            item_id: Some(f.item_id),
                            interface_id: None,
                        }),
                };
                if let Some(target) = target {
                    sites.push(TokenSite {
                        entry: i,
                        token: *token,
                        target,
                    });
                }
            }
        }

        resolve::host::resolve(self.source, &sites, &mut values)?;
        resolve::interface::resolve(
            self.source,
            &sites,
            config.interface,
            &|interfaces| self.expand_interfaces(interfaces),
            &mut values,
        )?;
        let events: Vec<Option<EventTime>> = entries.iter().map(|entry| entry.event).collect();
        resolve::item::resolve(
            self.source,
            &sites,
            &events,
            ItemValueOptions {
                since: self.history_since(),
                trim_length: self.config.effective_text_trim_length(),
                at_event: config.item_value_at_event,
            },
            &mut values,
        )?;

        let user_requests = if config.user_macros {
            self.resolve_user_macros(entries, &mut values)?
        } else {
            0
        };

        debug!(
            entries = entries.len(),
            sites = sites.len(),
            functions = functions.len(),
            user_requests,
            "entries resolved"
        );

        let known = |span: &str| filter.parse(span).is_some();
        Ok(entries
            .iter()
            .zip(&values)
            .map(|(entry, entry_values)| {
                let mut substitution = Substitution::new(entry_values).with_unresolved(&known);
                if let Some(references) = &entry.references {
                    substitution = substitution.with_references(references);
                }
                substitution.apply(entry.text)
            })
            .collect())
    }

    /// Look up the user macros of every entry and merge them into
    /// `values`. Returns the number of requests made.
    fn resolve_user_macros(
        &self,
        entries: &[Entry<'_>],
        values: &mut [EntryValues],
    ) -> Result<usize, SourceError> {
        let found: Vec<(usize, BTreeSet<String>)> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, scanner::user_macros(entry.text)))
            .filter(|(_, macros)| !macros.is_empty())
            .collect();
        if found.is_empty() {
            return Ok(0);
        }

        let trigger_ids = distinct(found.iter().filter_map(|(i, _)| match entries[*i].scope {
            HostScope::Trigger(id) => Some(id),
            HostScope::Hosts(_) => None,
        }));
        let trigger_hosts = self.fetch_trigger_hosts(trigger_ids)?;

        let (owners, requests): (Vec<usize>, Vec<UserMacroRequest>) = found
            .into_iter()
            .map(|(i, macros)| {
                let hosts: Vec<HostId> = match &entries[i].scope {
                    HostScope::Trigger(id) => trigger_hosts.get(id).cloned().unwrap_or_default(),
                    HostScope::Hosts(hosts) => hosts.to_vec(),
                };
                (i, UserMacroRequest::new(hosts, macros))
            })
            .unzip();

        let resolved = resolve::user::resolve(self.source, &requests)?;
        for (owner, macro_values) in owners.into_iter().zip(resolved) {
            values[owner].extend(macro_values);
        }
        Ok(requests.len())
    }
}
