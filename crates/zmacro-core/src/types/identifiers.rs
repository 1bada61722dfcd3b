//! Typed numeric identifiers.
//!
//! Each id wraps a `u64` so a `HostId` cannot be passed where an `ItemId`
//! is expected. Ordering is numeric, which is also the natural ordering
//! of the decimal ids the data layer hands out.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Trigger identifier.
    TriggerId
);

define_id!(
    /// Function identifier, as embedded in expressions as `{<id>}`.
    FunctionId
);

define_id!(
    /// Monitored item identifier.
    ItemId
);

define_id!(
    /// Host or template identifier. Templates share the host id space.
    HostId
);

define_id!(
    /// Host interface identifier.
    InterfaceId
);

define_id!(
    /// Value map identifier.
    ValueMapId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_ids_sort_numerically() {
        let mut ids = vec![HostId(10), HostId(9), HostId(100), HostId(1)];
        ids.sort();
        assert_eq!(ids, vec![HostId(1), HostId(9), HostId(10), HostId(100)]);
    }

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(FunctionId(13491).to_string(), "13491");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&ItemId(42)).unwrap();
        assert_eq!(json, "42");
        let back: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(back, ItemId(42));
    }
}
