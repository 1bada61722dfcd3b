//! Macro resolution engine.
//!
//! Expands `{...}` placeholders in monitoring configuration text (trigger
//! names, descriptions, URLs, item names and keys, map labels) into values
//! read through a [`DataSource`](zmacro_core::DataSource):
//!
//! - [`expression`]: function slots and literal operands of trigger expressions
//! - [`scanner`]: which macros a text contains
//! - [`resolve`]: per-category bulk value resolution and user macro inheritance
//! - [`substitute`]: the single-pass substitution over a text
//! - [`orchestrator`]: [`MacroResolver`], the batch entry points

pub mod expression;
pub mod format;
pub mod itemkey;
pub mod orchestrator;
pub mod resolve;
pub mod scanner;
pub mod substitute;
pub mod usermacro;

pub use orchestrator::{
    ExpressionOptions, ExpressionPart, FieldConfig, FunctionCall, MacroResolver, NameOptions,
    ResolvedExpression, TextConfig,
};
