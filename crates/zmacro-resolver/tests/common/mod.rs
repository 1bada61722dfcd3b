//! Shared fixture: two hosts, a template chain, interfaces, items with
//! history and triggers over them.
#![allow(dead_code)]

use zmacro_core::types::*;
use zmacro_core::MemorySource;

pub const NOW: i64 = 1_700_000_000;

pub fn item(id: u64, host: u64, key: &str, value_type: ValueType, units: &str) -> ItemRow {
    ItemRow {
        item_id: ItemId(id),
        host_id: HostId(host),
        interface_id: None,
        name: key.to_string(),
        key: key.to_string(),
        value_type,
        units: units.to_string(),
        value_map_id: None,
    }
}

pub fn function(id: u64, trigger: u64, item: u64, host: u64) -> FunctionRow {
    FunctionRow {
        function_id: FunctionId(id),
        trigger_id: TriggerId(trigger),
        item_id: ItemId(item),
        host_id: HostId(host),
        function: "last".into(),
        parameter: String::new(),
    }
}

pub fn interface(
    id: u64,
    host: u64,
    interface_type: InterfaceType,
    ip: &str,
    dns: &str,
    port: &str,
) -> InterfaceRow {
    InterfaceRow {
        interface_id: InterfaceId(id),
        host_id: HostId(host),
        interface_type,
        main: true,
        use_ip: !ip.is_empty(),
        ip: ip.to_string(),
        dns: dns.to_string(),
        port: port.to_string(),
    }
}

/// Hosts:
/// - 1 `web01` / `Web server`: agent 10.0.0.1:10050 and SNMP 10.0.0.2:161,
///   linked to template 500, which links to 501.
/// - 2 `db01` / `Database`: SNMP 10.0.1.1:161 only.
///
/// Items: 100 `system.cpu.load` (float, web01), 101 `vfs.fs.size[/,free]`
/// (unsigned B, web01), 200 `status` (unsigned, value map 7, db01).
///
/// Functions: 10 -> item 100 (trigger 1), 20 -> item 200 (trigger 2),
/// 30 -> item 101 and 31 -> item 200 (trigger 3).
pub fn monitored() -> MemorySource {
    let mut status = item(200, 2, "status", ValueType::Unsigned, "");
    status.value_map_id = Some(ValueMapId(7));

    MemorySource::new()
        .with_host(1, "web01", "Web server")
        .with_host(2, "db01", "Database")
        .with_host(500, "Template OS", "Template OS")
        .with_host(501, "Template Base", "Template Base")
        .with_template_link(1, 500)
        .with_template_link(500, 501)
        .with_interface(interface(12, 1, InterfaceType::Snmp, "10.0.0.2", "", "161"))
        .with_interface(interface(11, 1, InterfaceType::Agent, "10.0.0.1", "web01.local", "10050"))
        .with_interface(interface(21, 2, InterfaceType::Snmp, "10.0.1.1", "", "161"))
        .with_item(item(100, 1, "system.cpu.load", ValueType::Float, ""))
        .with_item(item(101, 1, "vfs.fs.size[/,free]", ValueType::Unsigned, "B"))
        .with_item(status)
        .with_function(function(10, 1, 100, 1))
        .with_function(function(20, 2, 200, 2))
        .with_function(function(30, 3, 101, 1))
        .with_function(function(31, 3, 200, 2))
        .with_value(100, NOW - 120, "0.5")
        .with_value(100, NOW - 60, "2.25")
        .with_value(101, NOW - 60, "2048")
        .with_value(200, NOW - 60, "1")
        .with_value_mapping(7, "1", "Up")
        .with_value_mapping(7, "0", "Down")
}

pub fn trigger(id: u64, description: &str, expression: &str) -> Trigger {
    Trigger::new(id, description, expression)
}
