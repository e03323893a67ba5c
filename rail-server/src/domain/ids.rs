//! Identifier newtypes for network records.
//!
//! Identifiers are assigned by the network store when records are added.
//! Keeping them as distinct types stops a schedule id being passed where a
//! route id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Station`](super::Station).
    StationId
);
record_id!(
    /// Identifier of a [`Train`](super::Train).
    TrainId
);
record_id!(
    /// Identifier of a [`Route`](super::Route).
    RouteId
);
record_id!(
    /// Identifier of a [`Schedule`](super::Schedule).
    ScheduleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&ScheduleId(42)).unwrap(), "42");
        let id: StationId = serde_json::from_str("7").unwrap();
        assert_eq!(id, StationId(7));
    }

    #[test]
    fn display() {
        assert_eq!(RouteId(3).to_string(), "3");
        assert_eq!(TrainId(12841).to_string(), "12841");
    }
}
