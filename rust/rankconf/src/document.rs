//! Read-only access to the raw configuration document.
//!
//! The resolution code never touches `serde_json` directly; it goes through the
//! [`DocumentNode`] capability: member lookup, typed scalar accessors and
//! array/object iteration. Objects must iterate in declaration order, since the
//! declaration order of `column_partitions` decides which rank owns which partition.
//!
//! A parsed `serde_json::Value` keeps only the last of several members with the same
//! name, so [`parse_json`] rejects duplicate member names in any object before the
//! tree is built. Documents handed to `from_document` as an already parsed tree have
//! lost their duplicates and are resolved as they are.

use std::fmt;

use ahash::AHashSet;
use rankconf_common::{Error, Result};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};

/// Minimal capability over a JSON-like document tree.
pub trait DocumentNode: Sized {
    /// Returns the member `name` if this node is an object that has it.
    fn member(&self, name: &str) -> Option<&Self>;

    fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// Returns the value as a signed 64-bit integer, if it is one.
    fn as_i64(&self) -> Option<i64>;

    fn as_str(&self) -> Option<&str>;

    fn as_array(&self) -> Option<&[Self]>;

    /// Iterates the members of an object in declaration order, or returns `None`
    /// if this node is not an object.
    fn members(&self) -> Option<impl Iterator<Item = (&str, &Self)>>;

    fn is_object(&self) -> bool {
        self.members().is_some()
    }

    /// Short description of the node type, used in error messages.
    fn kind_name(&self) -> &'static str;
}

impl DocumentNode for serde_json::Value {
    fn member(&self, name: &str) -> Option<&Self> {
        self.as_object().and_then(|obj| obj.get(name))
    }

    fn as_i64(&self) -> Option<i64> {
        serde_json::Value::as_i64(self)
    }

    fn as_str(&self) -> Option<&str> {
        serde_json::Value::as_str(self)
    }

    fn as_array(&self) -> Option<&[Self]> {
        serde_json::Value::as_array(self).map(Vec::as_slice)
    }

    fn members(&self) -> Option<impl Iterator<Item = (&str, &Self)>> {
        self.as_object()
            .map(|obj| obj.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn kind_name(&self) -> &'static str {
        use serde_json::Value;
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_i64() => "integer",
            Value::Number(n) if n.is_u64() => "integer out of i64 range",
            Value::Number(_) => "floating-point number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Parses JSON text into a document tree, failing on duplicate member names.
pub fn parse_json(text: &str) -> Result<serde_json::Value> {
    serde_json::from_str::<UniqueMembers>(text)?;
    Ok(serde_json::from_str(text)?)
}

/// Walks a JSON document and fails on the first object that repeats a member name.
struct UniqueMembers;

impl<'de> Deserialize<'de> for UniqueMembers {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UniqueMembersVisitor)
    }
}

struct UniqueMembersVisitor;

impl<'de> Visitor<'de> for UniqueMembersVisitor {
    type Value = UniqueMembers;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_i64<E>(self, _: i64) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_u64<E>(self, _: u64) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_f64<E>(self, _: f64) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_str<E>(self, _: &str) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_unit<E>(self) -> std::result::Result<UniqueMembers, E> {
        Ok(UniqueMembers)
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> std::result::Result<UniqueMembers, A::Error> {
        while seq.next_element::<UniqueMembers>()?.is_some() {}
        Ok(UniqueMembers)
    }

    fn visit_map<A: MapAccess<'de>>(
        self,
        mut map: A,
    ) -> std::result::Result<UniqueMembers, A::Error> {
        let mut seen = AHashSet::new();
        while let Some(name) = map.next_key::<String>()? {
            if seen.contains(&name) {
                return Err(de::Error::custom(format!("duplicate member \"{name}\"")));
            }
            map.next_value::<UniqueMembers>()?;
            seen.insert(name);
        }
        Ok(UniqueMembers)
    }
}

pub(crate) fn require_i64<N: DocumentNode>(field: &str, node: &N) -> Result<i64> {
    node.as_i64()
        .ok_or_else(|| Error::type_mismatch(field, "integer", node.kind_name()))
}

pub(crate) fn require_string<N: DocumentNode>(field: &str, node: &N) -> Result<String> {
    node.as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::type_mismatch(field, "string", node.kind_name()))
}

pub(crate) fn require_array<'a, N: DocumentNode>(field: &str, node: &'a N) -> Result<&'a [N]> {
    node.as_array()
        .ok_or_else(|| Error::type_mismatch(field, "array", node.kind_name()))
}
