//! Strongly typed string identifiers.
//!
//! The simulator names vehicles, routes, edges and lanes with free-form
//! strings.  Wrapping each kind in its own type keeps a `RouteId` from being
//! passed where an `EdgeId` is expected.  All IDs are `Clone + Ord + Hash` and
//! `Borrow<str>`, so maps keyed by an ID can be queried with a plain `&str`.

use std::borrow::Borrow;
use std::fmt;

/// Generate a typed ID wrapper around an owned `String`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(id: &str) -> Self {
                $name(id.to_owned())
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            #[inline]
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

typed_id! {
    /// Vehicle identifier, unique within one run (e.g. `car3`).
    pub struct VehicleId;
}

typed_id! {
    /// Route identifier, a key of the [`RouteRegistry`][crate::RouteRegistry].
    pub struct RouteId;
}

typed_id! {
    /// Network edge identifier (e.g. `E12`, `-E7`).
    pub struct EdgeId;
}

typed_id! {
    /// Lane identifier of the form `<edgeId>_<laneIndex>`.
    pub struct LaneId;
}

impl LaneId {
    /// The lane index text after the last `_`, if it is a non-empty run of
    /// ASCII digits.
    ///
    /// Edge ids may themselves contain underscores (`:J1_0_1`), so only the
    /// final separator counts.
    pub fn index_suffix(&self) -> Option<&str> {
        let (_, suffix) = self.0.rsplit_once('_')?;
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            Some(suffix)
        } else {
            None
        }
    }
}
