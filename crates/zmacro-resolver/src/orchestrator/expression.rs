//! Trigger expressions: `{<functionid>}` -> `{host:key.function(parameter)}`.

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use zmacro_core::constants::UNKNOWN_FUNCTION_STRING;
use zmacro_core::errors::ResolveError;
use zmacro_core::types::{FunctionId, HostId, HostRow, ItemId, ItemRow, Trigger, TriggerId};
use zmacro_core::DataSource;

use super::MacroResolver;
use crate::expression::{function_id, function_ids};
use crate::resolve::distinct;
use crate::resolve::user::{self, UserMacroRequest};
use crate::scanner;
use crate::substitute::{split, Piece};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionOptions {
    /// Also return the expression as a list of parts.
    pub html: bool,
    pub resolve_usermacros: bool,
    /// Expand macros in item keys and function parameters.
    pub resolve_macros: bool,
}

/// A function reference rendered with its host and item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function_id: FunctionId,
    pub host: String,
    pub key: String,
    pub function: String,
    pub parameter: String,
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}:{}.{}({})}}",
            self.host, self.key, self.function, self.parameter
        )
    }
}

/// One segment of a rendered expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionPart {
    Text(String),
    Function(FunctionCall),
    /// A function id whose function, item or host is gone.
    Error(FunctionId),
}

impl fmt::Display for ExpressionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Function(call) => call.fmt(f),
            Self::Error(_) => f.write_str(UNKNOWN_FUNCTION_STRING),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExpression {
    pub expression: String,
    /// Filled only when parts were requested.
    pub parts: Vec<ExpressionPart>,
}

fn push_text(parts: &mut Vec<ExpressionPart>, text: &str) {
    if let Some(ExpressionPart::Text(last)) = parts.last_mut() {
        last.push_str(text);
    } else {
        parts.push(ExpressionPart::Text(text.to_string()));
    }
}

impl<S: DataSource + ?Sized> MacroResolver<'_, S> {
    /// Render trigger expressions with host, key, function and parameter in
    /// place of function ids.
    #[instrument(skip(self, triggers), fields(batch = triggers.len()))]
    pub fn resolve_trigger_expressions(
        &self,
        triggers: &[Trigger],
        options: ExpressionOptions,
    ) -> Result<BTreeMap<TriggerId, ResolvedExpression>, ResolveError> {
        let all_ids = distinct(triggers.iter().flat_map(|t| function_ids(&t.expression)));
        let mut functions = self.fetch_functions(all_ids)?;

        let item_ids = distinct(functions.values().map(|f| f.item_id));
        let mut items: FxHashMap<ItemId, ItemRow> = if item_ids.is_empty() {
            FxHashMap::default()
        } else {
            self.source
                .fetch_items(&item_ids)?
                .into_iter()
                .map(|item| (item.item_id, item))
                .collect()
        };
        let host_ids = distinct(items.values().map(|item| item.host_id));
        let hosts: FxHashMap<HostId, HostRow> = if host_ids.is_empty() {
            FxHashMap::default()
        } else {
            self.source
                .fetch_hosts(&host_ids)?
                .into_iter()
                .map(|host| (host.host_id, host))
                .collect()
        };

        if options.resolve_macros {
            let item_rows: Vec<ItemRow> = items.values().cloned().collect();
            for (item_id, key) in self.item_keys(&item_rows)? {
                if let Some(item) = items.get_mut(&item_id) {
                    item.key = key;
                }
            }
            let function_rows: Vec<_> = functions.values().cloned().collect();
            for (function_id, parameter) in self.function_parameters(&function_rows)? {
                if let Some(function) = functions.get_mut(&function_id) {
                    function.parameter = parameter;
                }
            }
        }

        let user_values = if options.resolve_usermacros {
            let requests: Vec<UserMacroRequest> = triggers
                .iter()
                .map(|t| {
                    let hosts = distinct(
                        function_ids(&t.expression)
                            .into_iter()
                            .filter_map(|id| functions.get(&id))
                            .map(|f| f.host_id),
                    );
                    UserMacroRequest::new(hosts, scanner::user_macros(&t.expression))
                })
                .collect();
            if requests.iter().any(|r| !r.macros.is_empty()) {
                user::resolve(self.source, &requests)?
            } else {
                vec![FxHashMap::default(); triggers.len()]
            }
        } else {
            vec![FxHashMap::default(); triggers.len()]
        };

        let render_call = |id: FunctionId| -> Option<FunctionCall> {
            let function = functions.get(&id)?;
            let item = items.get(&function.item_id)?;
            let host = hosts.get(&item.host_id)?;
            Some(FunctionCall {
                function_id: id,
                host: host.host.clone(),
                key: item.key.clone(),
                function: function.function.clone(),
                parameter: function.parameter.clone(),
            })
        };

        let mut out = BTreeMap::new();
        let mut errors = 0usize;
        for (trigger, macro_values) in triggers.iter().zip(&user_values) {
            let mut parts = Vec::new();
            for piece in split(&trigger.expression) {
                match piece {
                    Piece::Span(span) => match function_id(span) {
                        Some(id) => match render_call(id) {
                            Some(call) => parts.push(ExpressionPart::Function(call)),
                            None => {
                                errors += 1;
                                parts.push(ExpressionPart::Error(id));
                            }
                        },
                        None => match macro_values.get(span) {
                            Some(value) => push_text(&mut parts, value),
                            None => push_text(&mut parts, span),
                        },
                    },
                    other => push_text(&mut parts, other.as_str()),
                }
            }
            let expression = parts.iter().map(ToString::to_string).collect();
            if !options.html {
                parts.clear();
            }
            out.insert(trigger.trigger_id, ResolvedExpression { expression, parts });
        }

        debug!(
            functions = functions.len(),
            items = items.len(),
            errors,
            "expressions resolved"
        );
        Ok(out)
    }
}
