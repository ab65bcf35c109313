use std::{borrow::Borrow, fmt};

/// Street and house number of a service request.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street : String,
    pub house  : String,
}

impl Address {
    pub fn new(street: impl Into<String>, house: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            house: house.into(),
        }
    }

    pub fn key(&self) -> AddressKey {
        AddressKey::new(&self.street, &self.house)
    }

    /// The free-form query sent to a geocoder.
    pub fn to_query_string(&self, locality: &str) -> String {
        [
            collapse_whitespace(&self.street),
            collapse_whitespace(&self.house),
            collapse_whitespace(locality),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Canonical cache key of an [`Address`].
///
/// Leading and trailing whitespace is removed and inner runs of whitespace
/// are collapsed into a single blank. Letter case is kept as is, so keys
/// stay compatible with caches written by earlier runs.
///
/// Both parts are joined by `_`. A `\` or `_` inside a part is escaped
/// with a backslash, so different addresses never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressKey(String);

impl AddressKey {
    const SEPARATOR: char = '_';
    const ESCAPE: char = '\\';

    pub fn new(street: &str, house: &str) -> Self {
        let street = Self::escape(&collapse_whitespace(street));
        let house = Self::escape(&collapse_whitespace(house));
        Self(format!("{street}{}{house}", Self::SEPARATOR))
    }

    fn escape(part: &str) -> String {
        let mut escaped = String::with_capacity(part.len());
        for c in part.chars() {
            if c == Self::SEPARATOR || c == Self::ESCAPE {
                escaped.push(Self::ESCAPE);
            }
            escaped.push(c);
        }
        escaped
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AddressKey {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<AddressKey> for String {
    fn from(from: AddressKey) -> Self {
        from.0
    }
}

impl AsRef<str> for AddressKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AddressKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
