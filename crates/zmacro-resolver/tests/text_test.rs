//! Host-bound texts under named configurations, and user macro lookup
//! through the template chain.

mod common;

use std::collections::BTreeMap;

use common::{interface, monitored, trigger, NOW};
use zmacro_core::errors::ResolveError;
use zmacro_core::types::*;
use zmacro_core::MemorySource;
use zmacro_resolver::{MacroResolver, NameOptions, TextConfig};

fn text(source: &MemorySource, config: TextConfig, host: u64, input: &str) -> String {
    let data = BTreeMap::from([(HostId(host), vec![input.to_string()])]);
    let mut resolved = MacroResolver::new(source)
        .at_time(NOW)
        .resolve_text(config, &data)
        .unwrap();
    resolved.remove(&HostId(host)).unwrap().remove(0)
}

#[test]
fn script_confirmation_mixes_host_interface_and_user_macros() {
    let source = monitored().with_host_macro(1, "{$OWNER}", "ops");
    assert_eq!(
        text(
            &source,
            TextConfig::ScriptConfirmation,
            1,
            "Restart {HOST.NAME} ({HOST.HOST}) at {HOST.CONN}? Ask {$OWNER}"
        ),
        "Restart Web server (web01) at 10.0.0.1? Ask ops"
    );
}

#[test]
fn agent_only_config_ignores_other_interfaces() {
    let source = monitored();
    assert_eq!(text(&source, TextConfig::HostInterfaceIpDns, 1, "{HOST.IP}"), "10.0.0.1");
    assert_eq!(text(&source, TextConfig::HostInterfaceIpDns, 2, "{HOST.IP}"), "*UNKNOWN*");
    assert_eq!(text(&source, TextConfig::HttpTestName, 2, "{HOST.IP}"), "10.0.1.1");
}

#[test]
fn user_only_configs_leave_builtins() {
    let source = monitored().with_host_macro(500, "{$AGENT.PORT}", "10050");
    assert_eq!(
        text(&source, TextConfig::HostInterfacePort, 1, "{$AGENT.PORT} {HOST.NAME}"),
        "10050 {HOST.NAME}"
    );
    assert_eq!(
        text(&source, TextConfig::ScreenElementUrlUser, 1, "/graph?h={HOST.ID}&p={$AGENT.PORT}"),
        "/graph?h={HOST.ID}&p=10050"
    );
}

#[test]
fn map_labels_know_host_ids() {
    let source = monitored();
    assert_eq!(
        text(&source, TextConfig::MapLabel, 2, "{HOST.NAME} #{HOST.ID}"),
        "Database #2"
    );
}

#[test]
fn result_keeps_the_shape_of_the_input() {
    let source = monitored();
    let data = BTreeMap::from([
        (HostId(1), vec!["{HOST.HOST}".to_string(), "plain".to_string()]),
        (HostId(2), vec![]),
        (HostId(3), vec!["{HOST.NAME}".to_string()]),
    ]);
    let resolved = MacroResolver::new(&source)
        .resolve_text(TextConfig::ScriptConfirmation, &data)
        .unwrap();
    assert_eq!(
        resolved,
        BTreeMap::from([
            (HostId(1), vec!["web01".to_string(), "plain".to_string()]),
            (HostId(2), vec![]),
            (HostId(3), vec!["*UNKNOWN*".to_string()]),
        ])
    );
}

#[test]
fn configurations_are_looked_up_by_name() {
    let source = monitored();
    let data = BTreeMap::from([(HostId(1), vec!["{HOST.NAME}".to_string()])]);
    let resolver = MacroResolver::new(&source);

    let resolved = resolver.resolve_text_named("mapLabel", &data).unwrap();
    assert_eq!(resolved[&HostId(1)], vec!["Web server".to_string()]);

    let err = resolver.resolve_text_named("graphName", &data).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownTextConfig { ref name } if name == "graphName"));
}

#[test]
fn interface_addresses_are_expanded_before_use() {
    let source = MemorySource::new()
        .with_host(3, "node3", "Node 3")
        .with_host(600, "Template Net", "Template Net")
        .with_template_link(3, 600)
        .with_host_macro(600, "{$SUBNET}", "192.168.1")
        .with_interface(interface(
            31,
            3,
            InterfaceType::Agent,
            "{$SUBNET}.5",
            "{HOST.HOST}.example.com",
            "10050",
        ));
    assert_eq!(
        text(&source, TextConfig::ScriptConfirmation, 3, "{HOST.IP} {HOST.DNS} {HOST.CONN}"),
        "192.168.1.5 node3.example.com 192.168.1.5"
    );
}

#[test]
fn host_macro_beats_template_and_global() {
    let source = monitored()
        .with_host_macro(1, "{$P}", "host")
        .with_host_macro(500, "{$P}", "template")
        .with_global_macro("{$P}", "global");
    assert_eq!(text(&source, TextConfig::ScriptConfirmation, 1, "{$P}"), "host");
}

#[test]
fn nested_templates_then_globals() {
    let source = monitored()
        .with_host_macro(501, "{$DEEP}", "base")
        .with_global_macro("{$G}", "global");
    assert_eq!(
        text(&source, TextConfig::ScriptConfirmation, 1, "{$DEEP} {$G} {$UNDEFINED}"),
        "base global {$UNDEFINED}"
    );
}

#[test]
fn lower_template_id_wins_within_a_level() {
    let source = MemorySource::new()
        .with_host(1, "web01", "Web server")
        .with_host(9, "T9", "T9")
        .with_host(10, "T10", "T10")
        .with_template_link(1, 10)
        .with_template_link(1, 9)
        .with_host_macro(10, "{$M}", "ten")
        .with_host_macro(9, "{$M}", "nine");
    assert_eq!(text(&source, TextConfig::ScriptConfirmation, 1, "{$M}"), "nine");
}

#[test]
fn template_cycles_terminate() {
    let source = monitored()
        .with_template_link(501, 500)
        .with_template_link(501, 1);
    assert_eq!(
        text(&source, TextConfig::ScriptConfirmation, 1, "{$MISSING}"),
        "{$MISSING}"
    );
}

#[test]
fn context_specific_values_come_first() {
    let source = monitored()
        .with_host_macro(1, "{$PORT}", "host-default")
        .with_host_macro(500, "{$PORT:\"eth0\"}", "eth0-port")
        .with_host_macro(501, "{$PORT:regex:\"^wlan\"}", "wireless-port");
    assert_eq!(
        text(
            &source,
            TextConfig::ScriptConfirmation,
            1,
            "{$PORT:\"eth0\"} {$PORT:wlan1} {$PORT:\"eth9\"} {$PORT}"
        ),
        "eth0-port wireless-port host-default host-default"
    );
}

#[test]
fn regex_context_references_stay_untouched() {
    let source = monitored()
        .with_host_macro(1, "{$M}", "base")
        .with_host_macro(1, "{$M:regex:\"^a\"}", "matched");
    assert_eq!(
        text(&source, TextConfig::ScriptConfirmation, 1, "x {$M:regex:\"^a\"} y {$M:abc}"),
        "x {$M:regex:\"^a\"} y matched"
    );
}

#[test]
fn defined_on_the_host_stops_the_walk() {
    let source = monitored().with_host_macro(1, "{$P}", "host");
    text(&source, TextConfig::ScriptConfirmation, 1, "{$P}");
    let calls = source.calls();
    assert_eq!(calls.host_macros, 1);
    assert_eq!(calls.global_macros, 0);
}

#[test]
fn trigger_macros_look_at_every_monitored_host() {
    // Trigger 3 watches web01 (1) and db01 (2).
    let source = monitored()
        .with_host_macro(2, "{$ONLY.DB}", "db")
        .with_host_macro(2, "{$BOTH}", "from-db")
        .with_host_macro(1, "{$BOTH}", "from-web");
    let resolved = MacroResolver::new(&source)
        .resolve_trigger_names(
            &[trigger(3, "{$ONLY.DB} {$BOTH}", "{30}>0 and {31}=1")],
            NameOptions::default(),
        )
        .unwrap();
    assert_eq!(resolved[&TriggerId(3)], "db from-web");
}
