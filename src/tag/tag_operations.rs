//! Tag Codec Operations - Pure Functions
//!
//! Converts between the host tag tree and the neutral tag tree. Both
//! directions recurse depth-first and always build fresh trees.
//!
//! The one deliberate asymmetry: a host list that cannot be converted
//! (mixed element kinds, or an element of an unknown kind somewhere inside)
//! degrades to an empty neutral list instead of failing the whole tree.

use super::tag_data::{CompoundTag, Tag, TagKind};
use crate::error::{BridgeError, BridgeResult};
use crate::host::{HostCompound, HostList, HostTag};

// ============================================================================
// HOST -> NEUTRAL
// ============================================================================

/// Convert a host tag into a neutral tag
pub fn to_neutral(foreign: &HostTag) -> BridgeResult<Tag> {
    Ok(match foreign {
        HostTag::Compound(compound) => Tag::Compound(compound_to_neutral(compound)?),
        HostTag::Byte(value) => Tag::Byte(*value),
        HostTag::ByteArray(values) => Tag::ByteArray(values.clone()),
        HostTag::Double(value) => Tag::Double(*value),
        HostTag::Float(value) => Tag::Float(*value),
        HostTag::Int(value) => Tag::Int(*value),
        HostTag::IntArray(values) => Tag::IntArray(values.clone()),
        HostTag::LongArray(values) => Tag::LongArray(values.clone()),
        HostTag::List(list) => match list_to_neutral(list) {
            Ok(values) => Tag::List(values),
            Err(e) => {
                log::warn!("[TagCodec::to_neutral] Failed to convert host list: {}", e);
                Tag::List(Vec::new())
            }
        },
        HostTag::Long(value) => Tag::Long(*value),
        HostTag::Short(value) => Tag::Short(*value),
        HostTag::String(value) => Tag::String(value.clone()),
        HostTag::End => Tag::End,
        HostTag::Opaque { .. } => {
            return Err(BridgeError::UnsupportedTagKind {
                kind: foreign.kind_name(),
            })
        }
    })
}

/// Absent input maps to absent output, never to `End`
pub fn to_neutral_opt(foreign: Option<&HostTag>) -> BridgeResult<Option<Tag>> {
    foreign.map(to_neutral).transpose()
}

pub fn compound_to_neutral(foreign: &HostCompound) -> BridgeResult<CompoundTag> {
    let mut values = CompoundTag::new();
    for (key, base) in foreign.iter() {
        values.insert(key.clone(), to_neutral(base)?);
    }
    Ok(values)
}

fn list_to_neutral(foreign: &HostList) -> BridgeResult<Vec<Tag>> {
    if !foreign.is_well_formed() {
        let found = foreign
            .iter()
            .find(|tag| tag.type_id() != foreign.element_type())
            .map(|tag| tag.kind_name())
            .unwrap_or_default();
        return Err(BridgeError::HeterogeneousList {
            expected: kind_label(foreign.element_type()),
            found,
        });
    }

    foreign.iter().map(to_neutral).collect()
}

// ============================================================================
// NEUTRAL -> HOST
// ============================================================================

/// Convert a neutral tag into a host tag
pub fn to_host(tag: &Tag) -> BridgeResult<HostTag> {
    Ok(match tag {
        Tag::Compound(compound) => HostTag::Compound(compound_to_host(compound)?),
        Tag::Byte(value) => HostTag::Byte(*value),
        Tag::ByteArray(values) => HostTag::ByteArray(values.clone()),
        Tag::Double(value) => HostTag::Double(*value),
        Tag::Float(value) => HostTag::Float(*value),
        Tag::Int(value) => HostTag::Int(*value),
        Tag::IntArray(values) => HostTag::IntArray(values.clone()),
        Tag::LongArray(values) => HostTag::LongArray(values.clone()),
        Tag::List(values) => HostTag::List(list_to_host(values)?),
        Tag::Long(value) => HostTag::Long(*value),
        Tag::Short(value) => HostTag::Short(*value),
        Tag::String(value) => HostTag::String(value.clone()),
        Tag::End => HostTag::End,
    })
}

/// Absent input maps to absent output
pub fn to_host_opt(tag: Option<&Tag>) -> BridgeResult<Option<HostTag>> {
    tag.map(to_host).transpose()
}

pub fn compound_to_host(compound: &CompoundTag) -> BridgeResult<HostCompound> {
    let mut tag = HostCompound::new();
    for (key, value) in compound.iter() {
        tag.put(key.clone(), to_host(value)?);
    }
    Ok(tag)
}

fn list_to_host(values: &[Tag]) -> BridgeResult<HostList> {
    let mut list = HostList::new();
    for value in values {
        let converted = to_host(value)?;
        let found = converted.kind_name();
        if !list.push(converted) {
            return Err(BridgeError::HeterogeneousList {
                expected: kind_label(list.element_type()),
                found,
            });
        }
    }
    Ok(list)
}

fn kind_label(type_id: u8) -> String {
    TagKind::from_id(type_id).map_or_else(|| format!("Opaque({})", type_id), |k| k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tag {
        let passenger = CompoundTag::new()
            .with("id", Tag::String("minecraft:zombie".into()))
            .with("Health", Tag::Float(20.0));
        Tag::Compound(
            CompoundTag::new()
                .with("end", Tag::End)
                .with("byte", Tag::Byte(-3))
                .with("short", Tag::Short(300))
                .with("int", Tag::Int(-70_000))
                .with("long", Tag::Long(i64::MIN))
                .with("float", Tag::Float(0.25))
                .with("double", Tag::Double(-1.5e300))
                .with("bytes", Tag::ByteArray(vec![1, -1, 0]))
                .with("ints", Tag::IntArray(vec![i32::MAX, 0]))
                .with("longs", Tag::LongArray(vec![]))
                .with("name", Tag::String("Bessie".into()))
                .with("empty", Tag::List(vec![]))
                .with(
                    "Pos",
                    Tag::List(vec![Tag::Double(1.0), Tag::Double(2.0), Tag::Double(3.0)]),
                )
                .with("Passengers", Tag::List(vec![Tag::Compound(passenger)])),
        )
    }

    #[test]
    fn test_neutral_round_trip() {
        let tree = sample_tree();
        let host = to_host(&tree).unwrap();
        assert_eq!(to_neutral(&host).unwrap(), tree);
    }

    #[test]
    fn test_host_round_trip() {
        let mut pos = HostList::new();
        pos.push(HostTag::Double(0.5));
        pos.push(HostTag::Double(64.0));
        let host = HostTag::Compound(
            HostCompound::new()
                .with("Pos", HostTag::List(pos))
                .with("Tags", HostTag::List(HostList::new()))
                .with("Air", HostTag::Short(300))
                .with("Inner", HostTag::Compound(HostCompound::new().with("x", HostTag::Byte(1)))),
        );
        let neutral = to_neutral(&host).unwrap();
        assert_eq!(to_host(&neutral).unwrap(), host);
    }

    #[test]
    fn test_empty_typed_host_list_round_trip() {
        // Storage may hand us an empty list still tagged with a compound type
        let host = HostTag::Compound(
            HostCompound::new().with("Items", HostTag::List(HostList::from_raw(10, vec![]))),
        );
        let neutral = to_neutral(&host).unwrap();
        assert_eq!(
            neutral.as_compound().unwrap().get("Items"),
            Some(&Tag::List(vec![]))
        );
        assert_eq!(to_host(&neutral).unwrap(), host);
    }

    #[test]
    fn test_every_kind_round_trips() {
        let mut doubles = HostList::new();
        doubles.push(HostTag::Double(0.5));
        doubles.push(HostTag::Double(-2.0));
        let mut inner = HostList::new();
        inner.push(HostTag::Int(7));
        let mut nested = HostList::new();
        nested.push(HostTag::List(inner));
        nested.push(HostTag::List(HostList::new()));
        let mut compounds = HostList::new();
        compounds.push(HostTag::Compound(
            HostCompound::new().with("id", HostTag::String("minecraft:pig".into())),
        ));
        compounds.push(HostTag::Compound(HostCompound::new()));

        let host = HostTag::Compound(
            HostCompound::new()
                .with("end", HostTag::End)
                .with("byte", HostTag::Byte(i8::MIN))
                .with("short", HostTag::Short(i16::MAX))
                .with("int", HostTag::Int(-1))
                .with("long", HostTag::Long(i64::MAX))
                .with("float", HostTag::Float(f32::MIN_POSITIVE))
                .with("double", HostTag::Double(1.0e-300))
                .with("bytes", HostTag::ByteArray(vec![]))
                .with("string", HostTag::String(String::new()))
                .with("ints", HostTag::IntArray(vec![1, 2, 3]))
                .with("longs", HostTag::LongArray(vec![i64::MIN]))
                .with("doubles", HostTag::List(doubles))
                .with("nested", HostTag::List(nested))
                .with("compounds", HostTag::List(compounds))
                .with("empty", HostTag::List(HostList::from_raw(8, vec![])))
                .with("inner", HostTag::Compound(HostCompound::new())),
        );

        let neutral = to_neutral(&host).unwrap();
        assert_eq!(to_host(&neutral).unwrap(), host);
        assert_eq!(to_neutral(&to_host(&neutral).unwrap()).unwrap(), neutral);
    }

    #[test]
    fn test_absent_maps_to_absent() {
        assert_eq!(to_neutral_opt(None).unwrap(), None);
        assert_eq!(to_host_opt(None).unwrap(), None);
        assert_eq!(to_neutral_opt(Some(&HostTag::End)).unwrap(), Some(Tag::End));
    }

    #[test]
    fn test_unknown_host_kind_is_fatal() {
        let opaque = HostTag::Opaque {
            type_id: 42,
            payload: vec![0xde, 0xad],
        };
        let err = to_neutral(&opaque).unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedTagKind { .. }));

        // Nested inside a compound the error still propagates
        let tree = HostTag::Compound(HostCompound::new().with("weird", opaque));
        assert!(to_neutral(&tree).is_err());
    }

    #[test]
    fn test_malformed_host_list_degrades_to_empty() {
        // Asymmetry: this does not round trip, the list comes back empty
        let mixed = HostList::from_raw(3, vec![HostTag::Int(1), HostTag::String("x".into())]);
        let tree = HostTag::Compound(HostCompound::new().with("mixed", HostTag::List(mixed)));
        let neutral = to_neutral(&tree).unwrap();
        assert_eq!(
            neutral.as_compound().unwrap().get("mixed"),
            Some(&Tag::List(vec![]))
        );
    }

    #[test]
    fn test_unknown_kind_inside_list_degrades_to_empty() {
        let list = HostList::from_raw(
            42,
            vec![HostTag::Opaque {
                type_id: 42,
                payload: vec![],
            }],
        );
        assert_eq!(to_neutral(&HostTag::List(list)).unwrap(), Tag::List(vec![]));
    }

    #[test]
    fn test_heterogeneous_neutral_list_is_fatal() {
        let tag = Tag::List(vec![Tag::Int(1), Tag::Long(2)]);
        let err = to_host(&tag).unwrap_err();
        match err {
            BridgeError::HeterogeneousList { expected, found } => {
                assert_eq!(expected, "Int");
                assert_eq!(found, "Long");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_conversion_produces_fresh_trees() {
        let tree = sample_tree();
        let mut host = match to_host(&tree).unwrap() {
            HostTag::Compound(compound) => compound,
            _ => unreachable!(),
        };
        host.remove("name");
        // Mutating the host copy leaves the neutral original untouched
        assert!(tree.as_compound().unwrap().contains_key("name"));
    }
}
