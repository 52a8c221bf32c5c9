use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// Immutable, reference-counted text for game names and genre tags.
///
/// Names are copied into every tooltip and genres into every selection set,
/// so clones only bump a refcount. Compares, orders and hashes by content,
/// and borrows as `str` for set lookups such as `tags.contains("Indie")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "String")]
pub struct SharedStr(Arc<str>);

impl SharedStr {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SharedStr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SharedStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Deref for SharedStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SharedStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SharedStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedStr {
    fn from(s: &str) -> Self {
        SharedStr(Arc::from(s))
    }
}

impl From<String> for SharedStr {
    fn from(s: String) -> Self {
        SharedStr(Arc::from(s))
    }
}

impl fmt::Display for SharedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// serde's `rc` feature is off; write the plain string.
impl Serialize for SharedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn clones_compare_by_content() {
        let name = SharedStr::from("Celeste");
        let copy = name.clone();
        assert_eq!(name, copy);
        assert_eq!(name, "Celeste");
        assert_eq!(SharedStr::from(format!("Half-Life {}", 2)), "Half-Life 2");
    }

    #[test]
    fn genre_sets_look_up_by_str() {
        let tags: BTreeSet<SharedStr> = ["Action", "Indie"].into_iter().map(SharedStr::from).collect();
        assert!(tags.contains("Indie"));
        assert!(!tags.contains("RPG"));
        let ordered: Vec<&str> = tags.iter().map(SharedStr::as_str).collect();
        assert_eq!(ordered, ["Action", "Indie"]);
    }

    #[test]
    fn json_uses_plain_strings() {
        let tag = SharedStr::from("Indie");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"Indie\"");
        let escaped: SharedStr = serde_json::from_str(r#""Tom Clancy\u2019s""#).unwrap();
        assert_eq!(escaped, "Tom Clancy\u{2019}s");
        assert_eq!(format!("{escaped}"), "Tom Clancy\u{2019}s");
    }
}
