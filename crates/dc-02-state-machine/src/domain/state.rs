//! # State Codes
//!
//! Lifecycle states are plain enums with stable integer codes. The codes are
//! what gets persisted (serde writes the bare integer) and queried
//! (`state = 800`); the names are what gets logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A lifecycle state with a persisted integer code.
pub trait StateCode:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Persisted code.
    fn code(self) -> i32;

    /// Inverse of [`StateCode::code`].
    fn from_code(code: i32) -> Option<Self>;

    /// Upper-case state name (`REQUESTED`).
    fn name(self) -> &'static str;

    /// No transition leaves a terminal state.
    fn is_terminal(self) -> bool;
}

/// Declares a state enum, its codes and its [`StateCode`] impl.
macro_rules! state_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $code:literal => $label:literal),+ $(,)?
        }
        terminal: [$($terminal:ident),+]
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $crate::domain::state::StateCode for $name {
            fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn is_terminal(self) -> bool {
                matches!(self, $(Self::$terminal)|+)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
                serializer.serialize_i32($crate::domain::state::StateCode::code(*self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<De: serde::Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
                let code = <i32 as serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::domain::state::StateCode>::from_code(code).ok_or_else(|| {
                    <De::Error as serde::de::Error>::custom(format!(
                        "unknown {} code {}",
                        stringify!($name),
                        code
                    ))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::domain::state::StateCode::name(*self))
            }
        }
    };
}

pub(crate) use state_codes;

/// Which side of the protocol an entity plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessType {
    Consumer,
    Provider,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "CONSUMER",
            Self::Provider => "PROVIDER",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Consumer => Self::Provider,
            Self::Provider => Self::Consumer,
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
