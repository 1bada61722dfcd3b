//! User macro inheritance: host -> templates -> templates of templates ->
//! global macros -> the macro's own text.
//!
//! The walk is breadth-first, one level per round. A round issues a single
//! macro query and a single template-link query for every host id that
//! some unfinished request reaches at that level, so query count grows
//! with template depth, never with batch size. Within a level ids are
//! visited in ascending numeric order and the first match wins. A request
//! stops walking as soon as it has a value; once no request is walking,
//! no further queries are issued.

use std::collections::BTreeSet;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use zmacro_core::errors::SourceError;
use zmacro_core::types::HostId;
use zmacro_core::DataSource;

use crate::usermacro::{MacroContext, UserMacro};

/// The user macros of one text and the hosts they are looked up on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserMacroRequest {
    pub host_ids: Vec<HostId>,
    pub macros: BTreeSet<String>,
}

impl UserMacroRequest {
    pub fn new(host_ids: impl IntoIterator<Item = HostId>, macros: BTreeSet<String>) -> Self {
        Self {
            host_ids: host_ids.into_iter().collect(),
            macros,
        }
    }
}

/// A compiled macro definition.
struct Definition {
    name: String,
    context: Option<DefinitionContext>,
    value: String,
}

enum DefinitionContext {
    Exact(String),
    Regex { pattern: String, regex: Regex },
}

impl Definition {
    fn regex_pattern(&self) -> Option<&str> {
        match &self.context {
            Some(DefinitionContext::Regex { pattern, .. }) => Some(pattern),
            _ => None,
        }
    }
}

/// Definitions of one host (or of the global table), with regex contexts
/// ordered by pattern text.
#[derive(Default)]
struct Definitions {
    list: Vec<Definition>,
}

impl Definitions {
    fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut list = Vec::new();
        for (text, value) in rows {
            let Some(parsed) = UserMacro::parse(text) else {
                tracing::debug!(macro_name = text, "skipping unparsable macro definition");
                continue;
            };
            let context = match parsed.context {
                None => None,
                Some(MacroContext::Exact(ctx)) => Some(DefinitionContext::Exact(ctx)),
                Some(MacroContext::Regex(pattern)) => match Regex::new(&pattern) {
                    Ok(regex) => Some(DefinitionContext::Regex { pattern, regex }),
                    Err(e) => {
                        tracing::debug!(
                            macro_name = text,
                            error = %e,
                            "skipping macro definition with invalid regex context"
                        );
                        continue;
                    }
                },
            };
            list.push(Definition {
                name: parsed.name,
                context,
                value: value.to_string(),
            });
        }
        list.sort_by(|a, b| a.regex_pattern().cmp(&b.regex_pattern()));
        Self { list }
    }

    fn exact(&self, name: &str, context: &str) -> Option<&str> {
        self.list.iter().find_map(|d| match &d.context {
            Some(DefinitionContext::Exact(ctx)) if d.name == name && ctx == context => {
                Some(d.value.as_str())
            }
            _ => None,
        })
    }

    fn regex(&self, name: &str, context: &str) -> Option<&str> {
        self.list.iter().find_map(|d| match &d.context {
            Some(DefinitionContext::Regex { regex, .. })
                if d.name == name && regex.is_match(context) =>
            {
                Some(d.value.as_str())
            }
            _ => None,
        })
    }

    fn base(&self, name: &str) -> Option<&str> {
        self.list
            .iter()
            .find(|d| d.name == name && d.context.is_none())
            .map(|d| d.value.as_str())
    }
}

/// One macro of one request being looked up.
struct Lookup {
    text: String,
    parsed: Option<UserMacro>,
    value: Option<String>,
    /// Base value found while looking for a context match.
    default: Option<String>,
}

impl Lookup {
    fn new(text: &str) -> Self {
        let parsed = UserMacro::parse(text);
        // Unparsable text can never match; it renders as itself.
        let value = parsed.is_none().then(|| text.to_string());
        Self {
            text: text.to_string(),
            parsed,
            value,
            default: None,
        }
    }

    fn done(&self) -> bool {
        self.value.is_some()
    }

    /// Try one definition set. Returns true once the lookup is done.
    fn visit(&mut self, defs: &Definitions) -> bool {
        let Some(parsed) = &self.parsed else {
            return true;
        };
        let name = parsed.name.as_str();
        match parsed.lookup_context() {
            Some(ctx) => {
                if let Some(v) = defs.exact(name, ctx).or_else(|| defs.regex(name, ctx)) {
                    self.value = Some(v.to_string());
                } else if self.default.is_none() {
                    self.default = defs.base(name).map(str::to_string);
                }
            }
            None => {
                self.value = defs.base(name).map(str::to_string);
            }
        }
        self.done()
    }

    fn finish(self) -> (String, String) {
        let value = self
            .value
            .or(self.default)
            .unwrap_or_else(|| self.text.clone());
        (self.text, value)
    }
}

struct RequestState {
    lookups: Vec<Lookup>,
    frontier: Vec<HostId>,
    visited: FxHashSet<HostId>,
}

impl RequestState {
    fn walking(&self) -> bool {
        !self.frontier.is_empty() && self.lookups.iter().any(|l| !l.done())
    }
}

fn sorted_unique(mut ids: Vec<HostId>) -> Vec<HostId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Resolve every request. The result is index-aligned with `requests` and
/// maps each macro text to its value.
pub fn resolve<S: DataSource + ?Sized>(
    source: &S,
    requests: &[UserMacroRequest],
) -> Result<Vec<FxHashMap<String, String>>, SourceError> {
    let mut states: Vec<RequestState> = requests
        .iter()
        .map(|request| {
            let frontier = sorted_unique(request.host_ids.clone());
            RequestState {
                lookups: request.macros.iter().map(|m| Lookup::new(m)).collect(),
                visited: frontier.iter().copied().collect(),
                frontier,
            }
        })
        .collect();

    let mut definitions: FxHashMap<HostId, Definitions> = FxHashMap::default();
    let mut links: FxHashMap<HostId, Vec<HostId>> = FxHashMap::default();
    let mut loaded: FxHashSet<HostId> = FxHashSet::default();
    let mut rounds = 0usize;

    loop {
        let needed = sorted_unique(
            states
                .iter()
                .filter(|s| s.walking())
                .flat_map(|s| s.frontier.iter().copied())
                .filter(|id| !loaded.contains(id))
                .collect(),
        );
        if states.iter().all(|s| !s.walking()) {
            break;
        }
        rounds += 1;

        if !needed.is_empty() {
            let rows = source.fetch_host_macros(&needed)?;
            let mut by_host: FxHashMap<HostId, Vec<(&str, &str)>> = FxHashMap::default();
            for row in &rows {
                by_host
                    .entry(row.host_id)
                    .or_default()
                    .push((row.macro_name.as_str(), row.value.as_str()));
            }
            for (host_id, host_rows) in by_host {
                definitions.insert(host_id, Definitions::from_rows(host_rows));
            }
            for link in source.fetch_host_template_links(&needed)? {
                links.entry(link.host_id).or_default().push(link.template_id);
            }
            loaded.extend(needed);
        }

        for state in states.iter_mut().filter(|s| s.walking()) {
            for host_id in &state.frontier {
                let Some(defs) = definitions.get(host_id) else {
                    continue;
                };
                for lookup in state.lookups.iter_mut().filter(|l| !l.done()) {
                    lookup.visit(defs);
                }
            }

            let next: Vec<HostId> = state
                .frontier
                .iter()
                .filter_map(|id| links.get(id))
                .flatten()
                .copied()
                .filter(|id| !state.visited.contains(id))
                .collect();
            let next = sorted_unique(next);
            state.visited.extend(next.iter().copied());
            state.frontier = next;
        }
    }

    let needs_globals = states
        .iter()
        .any(|s| s.lookups.iter().any(|l| !l.done()));
    if needs_globals {
        let rows = source.fetch_global_macros()?;
        let globals = Definitions::from_rows(
            rows.iter()
                .map(|row| (row.macro_name.as_str(), row.value.as_str())),
        );
        for state in &mut states {
            for lookup in state.lookups.iter_mut().filter(|l| !l.done()) {
                let Some(parsed) = &lookup.parsed else {
                    continue;
                };
                let name = parsed.name.as_str();
                lookup.value = match parsed.lookup_context() {
                    Some(ctx) => globals
                        .exact(name, ctx)
                        .or_else(|| globals.regex(name, ctx))
                        .map(str::to_string),
                    None => globals.base(name).map(str::to_string),
                };
                if lookup.value.is_none() && lookup.default.is_none() {
                    lookup.default = globals.base(name).map(str::to_string);
                }
            }
        }
    }

    tracing::debug!(
        requests = requests.len(),
        rounds,
        hosts_loaded = loaded.len(),
        globals = needs_globals,
        "user macros resolved"
    );

    Ok(states
        .into_iter()
        .map(|state| state.lookups.into_iter().map(Lookup::finish).collect())
        .collect())
}
