//! Closed enumerations with value, name and code lookups
//!
//! Every enumeration is registered once as an [`EnumType`]: an ordered table of
//! [`EnumItem`]s plus one index per lookup key. Registration fails fast when
//! two members share a value, a name or a code, so lookups never have to
//! decide between ambiguous candidates.
//!
//! Rust enums join the registry through [`define_enum!`], which implements
//! [`Enumeration`] and the serde traits on top of a lazily built table.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{CoreError, CoreResult};
use crate::value::Value;

/// A single registered member of an enumeration
///
/// Items are plain copyable handles into static data. Two items are equal
/// when they belong to the same enumeration and carry the same value key.
#[derive(Clone, Copy)]
pub struct EnumItem {
    enum_type: &'static str,
    value: &'static str,
    name: &'static str,
    code: Option<&'static str>,
    ordinal: usize,
}

impl EnumItem {
    /// Name of the enumeration this member belongs to
    pub fn enum_type(&self) -> &'static str {
        self.enum_type
    }

    /// Canonical machine key
    pub fn value(&self) -> &'static str {
        self.value
    }

    /// Localized display label
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Optional secondary key
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    /// Declaration position within the enumeration
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns true if this item is the given typed member
    pub fn is<E: Enumeration>(&self, member: E) -> bool {
        *self == member.item()
    }
}

impl PartialEq for EnumItem {
    fn eq(&self, other: &Self) -> bool {
        self.enum_type == other.enum_type && self.value == other.value
    }
}

impl Eq for EnumItem {}

impl Hash for EnumItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.enum_type.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Debug for EnumItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.enum_type, self.value)
    }
}

impl fmt::Display for EnumItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Member declaration: `(value, name, code)`
pub type EnumMember = (&'static str, &'static str, Option<&'static str>);

/// A registered enumeration
#[derive(Debug)]
pub struct EnumType {
    name: &'static str,
    items: Vec<EnumItem>,
    by_value: HashMap<&'static str, usize>,
    by_name: HashMap<&'static str, usize>,
    by_code: HashMap<&'static str, usize>,
}

impl EnumType {
    /// Registers an enumeration from its members in declaration order
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the enumeration, used in error messages and item equality
    /// * `members` - `(value, name, code)` triplets
    ///
    /// # Returns
    ///
    /// The lookup table, or `DuplicateEnumKey` if any value, name or code repeats
    pub fn new(name: &'static str, members: &[EnumMember]) -> CoreResult<Self> {
        let mut enum_type = Self {
            name,
            items: Vec::with_capacity(members.len()),
            by_value: HashMap::with_capacity(members.len()),
            by_name: HashMap::with_capacity(members.len()),
            by_code: HashMap::new(),
        };

        for (ordinal, &(value, label, code)) in members.iter().enumerate() {
            Self::register(&mut enum_type.by_value, name, "value", value, ordinal)?;
            Self::register(&mut enum_type.by_name, name, "name", label, ordinal)?;
            if let Some(code) = code {
                Self::register(&mut enum_type.by_code, name, "code", code, ordinal)?;
            }
            enum_type.items.push(EnumItem {
                enum_type: name,
                value,
                name: label,
                code,
                ordinal,
            });
        }

        Ok(enum_type)
    }

    fn register(
        index: &mut HashMap<&'static str, usize>,
        enum_type: &'static str,
        key_kind: &'static str,
        key: &'static str,
        ordinal: usize,
    ) -> CoreResult<()> {
        if index.insert(key, ordinal).is_some() {
            return Err(CoreError::DuplicateEnumKey {
                enum_type: enum_type.to_string(),
                key_kind,
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All members in declaration order
    pub fn values(&self) -> &[EnumItem] {
        &self.items
    }

    fn lookup(&self, index: &HashMap<&'static str, usize>, key: &str) -> Option<EnumItem> {
        if key.is_empty() {
            return None;
        }
        index.get(key).map(|&ordinal| self.items[ordinal])
    }

    pub fn of_value(&self, value: &str) -> Option<EnumItem> {
        self.lookup(&self.by_value, value)
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.of_value(value).is_some()
    }

    pub fn of_name(&self, name: &str) -> Option<EnumItem> {
        self.lookup(&self.by_name, name)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.of_name(name).is_some()
    }

    pub fn of_code(&self, code: &str) -> Option<EnumItem> {
        self.lookup(&self.by_code, code)
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.of_code(code).is_some()
    }

    /// Resolves a key by value, then by name, then by code
    pub fn of(&self, key: &str) -> Option<EnumItem> {
        self.of_value(key)
            .or_else(|| self.of_name(key))
            .or_else(|| self.of_code(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.of(key).is_some()
    }

    /// Returns true if the item is a member of this enumeration
    pub fn contains(&self, item: &EnumItem) -> bool {
        item.enum_type == self.name && self.items.get(item.ordinal) == Some(item)
    }

    /// Resolves a field value: text through [`EnumType::of`], items only when
    /// they belong to this enumeration, anything else to `None`
    pub fn resolve(&self, value: &Value) -> Option<EnumItem> {
        match value {
            Value::Text(key) => self.of(key),
            Value::Enum(item) if self.contains(item) => Some(*item),
            _ => None,
        }
    }
}

/// A Rust enum backed by a registered [`EnumType`]
///
/// Implemented by [`define_enum!`]; the variants map one to one, in order,
/// onto the registered items.
pub trait Enumeration: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The registered lookup table
    fn enum_type() -> &'static EnumType;

    /// All members in declaration order
    fn values() -> &'static [Self];

    fn ordinal(&self) -> usize;

    fn item(&self) -> EnumItem {
        Self::enum_type().values()[self.ordinal()]
    }

    fn value(&self) -> &'static str {
        self.item().value()
    }

    fn name(&self) -> &'static str {
        self.item().name()
    }

    fn code(&self) -> Option<&'static str> {
        self.item().code()
    }

    /// Converts a registered item back into the typed member
    fn from_item(item: EnumItem) -> Option<Self> {
        if !Self::enum_type().contains(&item) {
            return None;
        }
        Self::values().get(item.ordinal()).copied()
    }

    fn of_value(value: &str) -> Option<Self> {
        Self::enum_type().of_value(value).and_then(Self::from_item)
    }

    fn of_name(name: &str) -> Option<Self> {
        Self::enum_type().of_name(name).and_then(Self::from_item)
    }

    fn of_code(code: &str) -> Option<Self> {
        Self::enum_type().of_code(code).and_then(Self::from_item)
    }

    fn of(key: &str) -> Option<Self> {
        Self::enum_type().of(key).and_then(Self::from_item)
    }

    fn has(key: &str) -> bool {
        Self::enum_type().has(key)
    }

    /// Resolves a field value into the typed member
    fn resolve(value: &Value) -> Option<Self> {
        Self::enum_type().resolve(value).and_then(Self::from_item)
    }
}

/// Declares a Rust enum registered as an [`Enumeration`]
///
/// ```ignore
/// define_enum! {
///     /// Biological sex as recorded on a credential
///     pub enum Gender: "Gender" {
///         Male => ("MALE", "男", "1"),
///         Female => ("FEMALE", "女", "2"),
///     }
/// }
/// ```
///
/// The third element of a member tuple is the optional code.
#[macro_export]
macro_rules! define_enum {
    (@code) => {
        None
    };
    (@code $code:literal) => {
        Some($code)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $type_name:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => ($value:literal, $label:literal $(, $code:literal)?)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $crate::Enumeration for $name {
            fn enum_type() -> &'static $crate::EnumType {
                static TYPE: $crate::__private::Lazy<$crate::EnumType> =
                    $crate::__private::Lazy::new(|| {
                        $crate::EnumType::new(
                            $type_name,
                            &[$(($value, $label, $crate::define_enum!(@code $($code)?))),+],
                        )
                        .unwrap_or_else(|err| panic!("{}", err))
                    });
                &TYPE
            }

            fn values() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn ordinal(&self) -> usize {
                *self as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::Enumeration::name(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::CoreError;

            fn from_str(key: &str) -> Result<Self, Self::Err> {
                <$name as $crate::Enumeration>::of(key)
                    .ok_or_else(|| $crate::CoreError::invalid_enum_value($type_name, key))
            }
        }

        impl From<$name> for $crate::Value {
            fn from(member: $name) -> Self {
                $crate::Value::Enum($crate::Enumeration::item(&member))
            }
        }

        impl From<$name> for $crate::EnumItem {
            fn from(member: $name) -> Self {
                $crate::Enumeration::item(&member)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::Enumeration::value(self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let key = <String as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::Enumeration>::of(&key).ok_or_else(|| {
                    <D::Error as $crate::__private::serde::de::Error>::custom(format!(
                        "unknown {} value: {}",
                        $type_name, key
                    ))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::define_enum! {
        enum Color: "Color" {
            Red => ("RED", "红", "R"),
            Green => ("GREEN", "绿"),
        }
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = EnumType::new("Dup", &[("A", "甲", None), ("B", "甲", None)]);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateEnumKey { key_kind: "name", .. })
        ));

        let result = EnumType::new("Dup", &[("A", "甲", Some("1")), ("B", "乙", Some("1"))]);
        assert!(matches!(
            result,
            Err(CoreError::DuplicateEnumKey { key_kind: "code", .. })
        ));
    }

    #[test]
    fn test_lookup_order() {
        // "B" is the value of the first member and the name of the second
        let table = EnumType::new("Mixed", &[("B", "x", None), ("A", "B", None)]).unwrap();
        assert_eq!(table.of("B").map(|item| item.value()), Some("B"));
        assert_eq!(table.of_name("B").map(|item| item.value()), Some("A"));
    }

    #[test]
    fn test_empty_keys_not_found() {
        assert_eq!(Color::of(""), None);
        assert!(!Color::has(""));
        assert_eq!(Color::resolve(&Value::Null), None);
        assert_eq!(Color::of("BLUE"), None);
    }

    #[test]
    fn test_typed_round_trip() {
        assert_eq!(Color::of("RED"), Some(Color::Red));
        assert_eq!(Color::of("绿"), Some(Color::Green));
        assert_eq!(Color::of("R"), Some(Color::Red));
        assert_eq!(Color::Green.code(), None);
        assert_eq!(Color::Red.to_string(), "红");
        assert_eq!("GREEN".parse::<Color>(), Ok(Color::Green));
        assert!("BLUE".parse::<Color>().is_err());
    }

    #[test]
    fn test_resolve_rejects_foreign_items() {
        let other = EnumType::new("Other", &[("RED", "红", None)]).unwrap();
        let foreign = other.values()[0];
        assert_eq!(Color::resolve(&Value::Enum(foreign)), None);
        assert_eq!(Color::resolve(&Value::from(Color::Red)), Some(Color::Red));
    }

    #[test]
    fn test_serde_uses_value_key() {
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"RED\"");
        let parsed: Color = serde_json::from_str("\"绿\"").unwrap();
        assert_eq!(parsed, Color::Green);
    }
}
