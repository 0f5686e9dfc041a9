use serde::{Deserialize, Serialize};
use uuid::Uuid;

// UUID v7 keeps ids time-ordered, so "identity ascending" doubles as creation
// order wherever a tie-break on insertion order is needed.
macro_rules! define_id {
    ($id_name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $id_name(Uuid);

        impl $id_name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn raw(self) -> Uuid {
                self.0
            }
        }

        impl Default for $id_name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $id_name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $id_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $id_name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(UserId);
define_id!(BookId);
define_id!(BorrowId);
define_id!(ReservationId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_creation_ordered() {
        let a = ReservationId::new();
        let b = ReservationId::new();
        assert!(a < b);
    }

    #[test]
    fn id_round_trips_through_display() {
        let id = BookId::new();
        let parsed: BookId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
