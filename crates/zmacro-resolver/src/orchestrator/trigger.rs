//! Trigger names, descriptions and URLs.

use std::collections::BTreeMap;

use tracing::instrument;

use zmacro_core::errors::{ResolveError, SourceError};
use zmacro_core::types::{Trigger, TriggerId};
use zmacro_core::DataSource;

use super::{Binding, Entry, FieldConfig, HostScope, MacroResolver};
use crate::expression::FunctionIndex;
use crate::resolve::reference;
use crate::scanner;
use crate::substitute::References;

/// Options for trigger name resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameOptions {
    /// Only expand `$1`..`$9`.
    pub references_only: bool,
    /// `{ITEM.VALUE}` is the value at the trigger's event time.
    pub events: bool,
}

fn trigger_entry<'t>(trigger: &'t Trigger, text: &'t str) -> Entry<'t> {
    Entry::new(
        text,
        Binding::Slots(FunctionIndex::parse(&trigger.expression)),
        HostScope::Trigger(trigger.trigger_id),
    )
    .with_trigger(trigger.trigger_id)
    .with_event((trigger.clock, trigger.ns))
}

impl<S: DataSource + ?Sized> MacroResolver<'_, S> {
    /// Reference values per trigger, for triggers whose name uses `$n`.
    /// User macros in the expression are expanded first.
    fn trigger_references(
        &self,
        triggers: &[Trigger],
    ) -> Result<Vec<Option<References>>, SourceError> {
        let mut references = vec![None; triggers.len()];
        let wanted: Vec<usize> = triggers
            .iter()
            .enumerate()
            .filter(|(_, t)| scanner::has_references(&t.description))
            .map(|(i, _)| i)
            .collect();
        if wanted.is_empty() {
            return Ok(references);
        }

        let entries: Vec<Entry<'_>> = wanted
            .iter()
            .map(|&i| {
                let t = &triggers[i];
                Entry::new(&t.expression, Binding::Unbound, HostScope::Trigger(t.trigger_id))
            })
            .collect();
        let expanded = self.resolve_entries(&entries, &FieldConfig::USER_ONLY)?;
        for (i, expression) in wanted.into_iter().zip(expanded) {
            references[i] = Some(reference::from_expression(&expression));
        }
        Ok(references)
    }

    fn resolve_trigger_field(
        &self,
        triggers: &[Trigger],
        field: impl Fn(&Trigger) -> &str,
        config: &FieldConfig,
        references: Vec<Option<References>>,
    ) -> Result<BTreeMap<TriggerId, String>, SourceError> {
        let entries: Vec<Entry<'_>> = triggers
            .iter()
            .zip(references)
            .map(|(t, refs)| trigger_entry(t, field(t)).with_references(refs))
            .collect();
        let resolved = self.resolve_entries(&entries, config)?;
        Ok(triggers.iter().map(|t| t.trigger_id).zip(resolved).collect())
    }

    /// Resolve trigger names (`description`).
    #[instrument(skip(self, triggers), fields(batch = triggers.len()))]
    pub fn resolve_trigger_names(
        &self,
        triggers: &[Trigger],
        options: NameOptions,
    ) -> Result<BTreeMap<TriggerId, String>, ResolveError> {
        let references = self.trigger_references(triggers)?;
        let config = if options.references_only {
            FieldConfig::NONE
        } else {
            FieldConfig {
                item_value_at_event: options.events,
                ..FieldConfig::TRIGGER_NAME
            }
        };
        Ok(self.resolve_trigger_field(triggers, |t| &t.description, &config, references)?)
    }

    /// Resolve trigger descriptions (`comments`). Item values are always
    /// the latest ones.
    #[instrument(skip(self, triggers), fields(batch = triggers.len()))]
    pub fn resolve_trigger_descriptions(
        &self,
        triggers: &[Trigger],
    ) -> Result<BTreeMap<TriggerId, String>, ResolveError> {
        let none = vec![None; triggers.len()];
        Ok(self.resolve_trigger_field(
            triggers,
            |t| &t.comments,
            &FieldConfig::TRIGGER_DESCRIPTION,
            none,
        )?)
    }

    /// Resolve trigger URLs.
    #[instrument(skip(self, triggers), fields(batch = triggers.len()))]
    pub fn resolve_trigger_urls(
        &self,
        triggers: &[Trigger],
    ) -> Result<BTreeMap<TriggerId, String>, ResolveError> {
        let none = vec![None; triggers.len()];
        Ok(self.resolve_trigger_field(triggers, |t| &t.url, &FieldConfig::TRIGGER_URL, none)?)
    }
}
