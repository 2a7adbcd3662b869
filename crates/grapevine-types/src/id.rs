use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        ///
        /// Ids are allocated monotonically by the store in creation order,
        /// starting at 1. Ordering ids therefore orders entities by creation,
        /// which the sequential selection policies rely on.
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// The raw id value.
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id! {
    /// Identifier for a [`Game`](crate::Game).
    GameId
}

entity_id! {
    /// Identifier for a [`Chain`](crate::Chain).
    ChainId
}

entity_id! {
    /// Identifier for a [`Message`](crate::Message).
    MessageId
}
