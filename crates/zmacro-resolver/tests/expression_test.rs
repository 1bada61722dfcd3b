//! Trigger expression rendering.

mod common;

use common::{monitored, trigger};
use zmacro_core::types::*;
use zmacro_core::MemorySource;
use zmacro_resolver::{ExpressionOptions, ExpressionPart, FunctionCall, MacroResolver};

fn expression(source: &MemorySource, expr: &str, options: ExpressionOptions) -> (String, Vec<ExpressionPart>) {
    let mut resolved = MacroResolver::new(source)
        .resolve_trigger_expressions(&[trigger(1, "name", expr)], options)
        .unwrap();
    let out = resolved.remove(&TriggerId(1)).unwrap();
    (out.expression, out.parts)
}

fn call(function_id: u64, host: &str, key: &str, function: &str, parameter: &str) -> FunctionCall {
    FunctionCall {
        function_id: FunctionId(function_id),
        host: host.into(),
        key: key.into(),
        function: function.into(),
        parameter: parameter.into(),
    }
}

#[test]
fn function_ids_become_host_key_function() {
    let source = monitored();
    let (text, parts) = expression(&source, "{30}>0 and {31}=1", ExpressionOptions::default());
    assert_eq!(text, "{web01:vfs.fs.size[/,free].last()}>0 and {db01:status.last()}=1");
    assert!(parts.is_empty());

    let calls = source.calls();
    assert_eq!((calls.functions, calls.items, calls.hosts), (1, 1, 1));
}

#[test]
fn html_mode_returns_parts() {
    let source = monitored();
    let options = ExpressionOptions {
        html: true,
        ..ExpressionOptions::default()
    };
    let (text, parts) = expression(&source, "{30}>0 and {31}=1", options);
    assert_eq!(
        parts,
        vec![
            ExpressionPart::Function(call(30, "web01", "vfs.fs.size[/,free]", "last", "")),
            ExpressionPart::Text(">0 and ".into()),
            ExpressionPart::Function(call(31, "db01", "status", "last", "")),
            ExpressionPart::Text("=1".into()),
        ]
    );
    let joined: String = parts.iter().map(ToString::to_string).collect();
    assert_eq!(joined, text);
}

#[test]
fn missing_function_renders_as_error() {
    let source = monitored();
    let options = ExpressionOptions {
        html: true,
        ..ExpressionOptions::default()
    };
    let (text, parts) = expression(&source, "{77}>0 or {10}>5", options);
    assert_eq!(text, "*ERROR*>0 or {web01:system.cpu.load.last()}>5");
    assert_eq!(parts[0], ExpressionPart::Error(FunctionId(77)));
}

#[test]
fn other_macros_are_kept_verbatim() {
    let source = monitored();
    let (text, _) = expression(&source, "{10}>5 or {TRIGGER.VALUE}=1", ExpressionOptions::default());
    assert_eq!(text, "{web01:system.cpu.load.last()}>5 or {TRIGGER.VALUE}=1");
}

#[test]
fn user_macros_expand_only_on_request() {
    let source = monitored().with_host_macro(1, "{$MIN.FREE}", "1G");
    let (raw, _) = expression(&source, "{30}<{$MIN.FREE}", ExpressionOptions::default());
    assert_eq!(raw, "{web01:vfs.fs.size[/,free].last()}<{$MIN.FREE}");

    let options = ExpressionOptions {
        resolve_usermacros: true,
        ..ExpressionOptions::default()
    };
    let (expanded, _) = expression(&source, "{30}<{$MIN.FREE} and {31}={$UNDEFINED}", options);
    assert_eq!(
        expanded,
        "{web01:vfs.fs.size[/,free].last()}<1G and {db01:status.last()}={$UNDEFINED}"
    );
}

#[test]
fn keys_and_parameters_expand_with_resolve_macros() {
    let mut key_item = common::item(102, 1, "net.if.in[{$IF},{HOST.HOST}]", ValueType::Unsigned, "bps");
    key_item.name = "Traffic".into();
    let source = monitored()
        .with_item(key_item)
        .with_function(FunctionRow {
            function_id: FunctionId(50),
            trigger_id: TriggerId(1),
            item_id: ItemId(102),
            host_id: HostId(1),
            function: "avg".into(),
            parameter: "{$PERIOD}".into(),
        })
        .with_host_macro(1, "{$IF}", "eth0")
        .with_host_macro(500, "{$PERIOD}", "5m");

    let (raw, _) = expression(&source, "{50}>100", ExpressionOptions::default());
    assert_eq!(raw, "{web01:net.if.in[{$IF},{HOST.HOST}].avg({$PERIOD})}>100");

    let options = ExpressionOptions {
        resolve_macros: true,
        ..ExpressionOptions::default()
    };
    let (expanded, _) = expression(&source, "{50}>100", options);
    assert_eq!(expanded, "{web01:net.if.in[eth0,web01].avg(5m)}>100");
}
