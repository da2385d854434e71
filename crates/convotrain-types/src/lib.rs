//! Validated text types shared across the convotrain crates.
//!
//! Entity and intent names arrive from CSV cells and end up as display names on
//! a remote conversational-AI service, so they are validated once at the
//! ingestion boundary and carried as newtypes from then on.

/// Errors that can occur when creating validated name types.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The input text was empty or contained only whitespace.
    #[error("name cannot be empty")]
    Empty,
}

macro_rules! trimmed_name {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Creates a new name from the given input.
            ///
            /// The input is trimmed of leading and trailing whitespace. If the
            /// trimmed result is empty, an error is returned.
            pub fn new(input: impl AsRef<str>) -> Result<Self, NameError> {
                let trimmed = input.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(NameError::Empty);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Returns the inner string as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $name::new(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

trimmed_name! {
    /// The name of an entity type (e.g. `product`).
    ///
    /// This is the bare name; the `@`-prefixed form used inside annotated
    /// phrases is derived from it, never stored.
    EntityName
}

trimmed_name! {
    /// The display name of an intent.
    IntentName
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let name = EntityName::new("  product \t").expect("valid name");
        assert_eq!(name.as_str(), "product");
    }

    #[test]
    fn rejects_whitespace_only_input() {
        assert!(matches!(EntityName::new("   "), Err(NameError::Empty)));
        assert!(matches!(IntentName::new(""), Err(NameError::Empty)));
    }

    #[test]
    fn preserves_interior_whitespace_and_case() {
        let name = IntentName::new("Open Account").expect("valid name");
        assert_eq!(name.as_str(), "Open Account");
    }

    #[test]
    fn serialises_as_plain_string() {
        let name = EntityName::new("product").expect("valid name");
        let json = serde_json::to_string(&name).expect("serialise");
        assert_eq!(json, "\"product\"");

        let back: EntityName = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, name);
    }

    #[test]
    fn deserialisation_rejects_empty_string() {
        let result: Result<EntityName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
