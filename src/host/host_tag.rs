//! Host tag tree
//!
//! Mirrors the host's own tag representation, including kinds the bridge does
//! not understand and lists whose elements disagree with the declared element
//! type (both can come out of host storage).

use std::collections::BTreeMap;

/// Host tag node
#[derive(Debug, Clone, PartialEq)]
pub enum HostTag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(HostList),
    Compound(HostCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    /// Host-specific kind outside the shared vocabulary
    Opaque { type_id: u8, payload: Vec<u8> },
}

impl HostTag {
    pub fn type_id(&self) -> u8 {
        match self {
            HostTag::End => 0,
            HostTag::Byte(_) => 1,
            HostTag::Short(_) => 2,
            HostTag::Int(_) => 3,
            HostTag::Long(_) => 4,
            HostTag::Float(_) => 5,
            HostTag::Double(_) => 6,
            HostTag::ByteArray(_) => 7,
            HostTag::String(_) => 8,
            HostTag::List(_) => 9,
            HostTag::Compound(_) => 10,
            HostTag::IntArray(_) => 11,
            HostTag::LongArray(_) => 12,
            HostTag::Opaque { type_id, .. } => *type_id,
        }
    }

    /// Human-readable kind, used in error messages
    pub fn kind_name(&self) -> String {
        match (self, crate::tag::TagKind::from_id(self.type_id())) {
            (HostTag::Opaque { type_id, .. }, _) => format!("Opaque({})", type_id),
            (_, Some(kind)) => kind.to_string(),
            (other, None) => other.type_id().to_string(),
        }
    }
}

/// Typed host list; the element type is fixed by the first element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostList {
    element_type: u8,
    values: Vec<HostTag>,
}

impl HostList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw constructor used when decoding storage; no validation
    ///
    /// An empty list has no element type and is stored as END.
    pub fn from_raw(element_type: u8, values: Vec<HostTag>) -> Self {
        let element_type = if values.is_empty() { 0 } else { element_type };
        Self {
            element_type,
            values,
        }
    }

    /// Appends a tag, refusing one of a different kind than the list holds
    pub fn push(&mut self, tag: HostTag) -> bool {
        if self.values.is_empty() {
            self.element_type = tag.type_id();
        } else if tag.type_id() != self.element_type {
            return false;
        }
        self.values.push(tag);
        true
    }

    pub fn element_type(&self) -> u8 {
        self.element_type
    }

    /// Every element matches the declared element type
    pub fn is_well_formed(&self) -> bool {
        self.values
            .iter()
            .all(|value| value.type_id() == self.element_type)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostTag> {
        self.values.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HostTag> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.element_type = 0;
    }
}

/// Host compound; a sorted tree map on the host side
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostCompound {
    entries: BTreeMap<String, HostTag>,
}

impl HostCompound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, tag: HostTag) -> Option<HostTag> {
        self.entries.insert(key.into(), tag)
    }

    pub fn with(mut self, key: impl Into<String>, tag: HostTag) -> Self {
        self.entries.insert(key.into(), tag);
        self
    }

    pub fn get(&self, key: &str) -> Option<&HostTag> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut HostTag> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<HostTag> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HostTag)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges every entry of `other` over this compound
    pub fn merge(&mut self, other: &HostCompound) {
        for (key, value) in other.iter() {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_enforces_element_type() {
        let mut list = HostList::new();
        assert!(list.push(HostTag::Int(1)));
        assert!(!list.push(HostTag::String("x".into())));
        assert_eq!(list.len(), 1);
        assert_eq!(list.element_type(), 3);
        assert!(list.is_well_formed());
    }

    #[test]
    fn test_raw_list_can_be_malformed() {
        let list = HostList::from_raw(3, vec![HostTag::Int(1), HostTag::Byte(2)]);
        assert!(!list.is_well_formed());
    }

    #[test]
    fn test_empty_raw_list_has_end_type() {
        let list = HostList::from_raw(10, vec![]);
        assert_eq!(list.element_type(), 0);
        assert_eq!(list, HostList::new());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(HostTag::Int(0).kind_name(), "Int");
        let opaque = HostTag::Opaque {
            type_id: 99,
            payload: vec![],
        };
        assert_eq!(opaque.kind_name(), "Opaque(99)");
    }
}
