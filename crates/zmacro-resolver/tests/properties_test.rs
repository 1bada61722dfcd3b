//! Property tests for splitting and substitution.

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;
use zmacro_core::types::{FxHashMap, HostId};
use zmacro_core::MemorySource;
use zmacro_resolver::substitute::{split, Substitution};
use zmacro_resolver::{MacroResolver, TextConfig};

proptest! {
    #[test]
    fn pieces_cover_the_input(text in "[a-z{}$0-9:\"\\\\ .]{0,48}") {
        let joined: String = split(&text).iter().map(|piece| piece.as_str()).collect();
        prop_assert_eq!(joined, text);
    }

    #[test]
    fn plain_text_is_returned_unchanged(text in "[a-zA-Z0-9 .,:;!?()\\[\\]#%-]{0,64}") {
        let source = common::monitored();
        let data = BTreeMap::from([(HostId(1), vec![text.clone()])]);
        let resolved = MacroResolver::new(&source)
            .resolve_text(TextConfig::ScriptConfirmation, &data)
            .unwrap();
        prop_assert_eq!(&resolved[&HostId(1)][0], &text);
        prop_assert_eq!(source.calls().total(), 0);
    }

    #[test]
    fn replacements_of_any_length_land_in_place(
        a in "[A-Za-z0-9{}$ ]{0,12}",
        b in "[A-Za-z0-9{}$ ]{0,12}",
    ) {
        let values: FxHashMap<String, String> = [
            ("{A}".to_string(), a.clone()),
            ("{B}".to_string(), b.clone()),
        ]
        .into_iter()
        .collect();
        let out = Substitution::new(&values).apply("<{A}{B}>");
        prop_assert_eq!(out, format!("<{a}{b}>"));
    }
}

#[test]
fn substituted_values_are_not_expanded_again() {
    let source = MemorySource::new()
        .with_host(1, "{HOST.NAME}", "{HOST.HOST} {$X}")
        .with_host_macro(1, "{$X}", "x");
    let data = BTreeMap::from([(HostId(1), vec!["{HOST.NAME}|{HOST.HOST}|{$X}".to_string()])]);
    let resolved = MacroResolver::new(&source)
        .resolve_text(TextConfig::ScriptConfirmation, &data)
        .unwrap();
    assert_eq!(resolved[&HostId(1)][0], "{HOST.HOST} {$X}|{HOST.NAME}|x");
}
