//! Macro for the non-empty string newtypes used as graph keys.
//!
//! Model names and row names are both plain strings on the wire but must
//! never be confused with each other, or with column names, once inside the
//! engine.

/// Define a strongly-typed, non-empty name.
///
/// Generates the struct plus `Display`, `Deref<Target=str>`, `Borrow<str>`
/// (so maps keyed by the name can be queried with `&str`), comparisons
/// against string types, and a `Deserialize` that rejects empty input.
macro_rules! define_name {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident($kind:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl $Name {
            /// Create a name, panicking if it is empty.
            ///
            /// Use [`parse`](Self::parse) for names read from fixture files.
            pub fn new(name: impl Into<String>) -> Self {
                let s = name.into();
                assert!(!s.is_empty(), concat!($kind, " must not be empty"));
                Self(s)
            }

            /// Create a name, rejecting the empty string.
            pub fn parse(name: impl Into<String>) -> $crate::error::CoreResult<Self> {
                let s = name.into();
                if s.is_empty() {
                    Err($crate::error::CoreError::EmptyName { kind: $kind })
                } else {
                    Ok(Self(s))
                }
            }

            /// Borrow the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::parse(s).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

pub(crate) use define_name;
