//! Type-safe identifiers for schedule entities.
//!
//! All identifiers use Arc<str> so trips, stops and hit regions can share
//! station names without copying them every frame.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

impl_identifier!(StationIdentifier);
impl_identifier!(TripIdentifier);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StationIdentifier::new("はりまや橋");
        let id2 = StationIdentifier::new("はりまや橋");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_borrowed_lookup() {
        use std::collections::HashSet;

        let set: HashSet<StationIdentifier> = [StationIdentifier::new("県庁前")].into();

        assert!(set.contains("県庁前"));
        assert!(!set.contains("堀詰"));
    }

    #[test]
    fn test_identifier_display() {
        let id = TripIdentifier::new("main#3");
        assert_eq!(format!("{}", id), "main#3");
    }

    #[test]
    fn test_empty_identifier() {
        assert!(StationIdentifier::new("").is_empty());
        assert!(!StationIdentifier::new("鏡川橋").is_empty());
    }
}
