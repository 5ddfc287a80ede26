//! Host block model
//!
//! Blocks, their runtime property definitions and concrete block states, as
//! the host defines them. Property objects are shared through `Arc` and are
//! never cloned, so each one has a single identity.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_PROPERTY_HANDLE: AtomicU32 = AtomicU32::new(1);

/// Stable integer identity of a host property object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyHandle(pub u32);

/// Host-side direction constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostDirection {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl HostDirection {
    pub const ALL: [HostDirection; 6] = [
        HostDirection::Down,
        HostDirection::Up,
        HostDirection::North,
        HostDirection::South,
        HostDirection::West,
        HostDirection::East,
    ];

    pub const HORIZONTAL: [HostDirection; 4] = [
        HostDirection::North,
        HostDirection::South,
        HostDirection::West,
        HostDirection::East,
    ];

    pub fn serialized_name(&self) -> &'static str {
        match self {
            HostDirection::Down => "down",
            HostDirection::Up => "up",
            HostDirection::North => "north",
            HostDirection::South => "south",
            HostDirection::West => "west",
            HostDirection::East => "east",
        }
    }
}

/// Runtime kind of a host property, with its possible values in declaration order
#[derive(Debug, Clone, PartialEq)]
pub enum HostPropertyKind {
    Boolean(Vec<bool>),
    Direction(Vec<HostDirection>),
    /// Serialized names of the enum constants
    Enum(Vec<String>),
    Integer(Vec<i32>),
    /// A kind the host added that has no shared vocabulary yet
    Other(String),
}

/// Concrete value stored in a host block state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostValue {
    Bool(bool),
    Direction(HostDirection),
    /// Ordinal into the property's enum constants
    Enum(u16),
    Int(i32),
}

/// One block-state axis as defined by the host
#[derive(Debug)]
pub struct HostProperty {
    name: String,
    kind: HostPropertyKind,
    handle: OnceLock<PropertyHandle>,
}

impl HostProperty {
    pub fn new(name: impl Into<String>, kind: HostPropertyKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            kind,
            handle: OnceLock::new(),
        })
    }

    pub fn boolean(name: &str) -> Arc<Self> {
        Self::new(name, HostPropertyKind::Boolean(vec![true, false]))
    }

    pub fn direction(name: &str, values: &[HostDirection]) -> Arc<Self> {
        Self::new(name, HostPropertyKind::Direction(values.to_vec()))
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Arc<Self> {
        Self::new(
            name,
            HostPropertyKind::Enum(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    pub fn integer(name: &str, min: i32, max: i32) -> Arc<Self> {
        Self::new(name, HostPropertyKind::Integer((min..=max).collect()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &HostPropertyKind {
        &self.kind
    }

    /// Identity handle, assigned the first time anyone asks for it
    pub fn handle(&self) -> PropertyHandle {
        *self
            .handle
            .get_or_init(|| PropertyHandle(NEXT_PROPERTY_HANDLE.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn possible_values(&self) -> Vec<HostValue> {
        match &self.kind {
            HostPropertyKind::Boolean(values) => {
                values.iter().map(|v| HostValue::Bool(*v)).collect()
            }
            HostPropertyKind::Direction(values) => {
                values.iter().map(|v| HostValue::Direction(*v)).collect()
            }
            HostPropertyKind::Enum(values) => {
                (0..values.len()).map(|i| HostValue::Enum(i as u16)).collect()
            }
            HostPropertyKind::Integer(values) => {
                values.iter().map(|v| HostValue::Int(*v)).collect()
            }
            HostPropertyKind::Other(_) => Vec::new(),
        }
    }

    pub fn is_valid(&self, value: &HostValue) -> bool {
        self.possible_values().contains(value)
    }

    /// Enum constant by exact serialized-name match
    pub fn enum_value(&self, name: &str) -> Option<HostValue> {
        match &self.kind {
            HostPropertyKind::Enum(values) => values
                .iter()
                .position(|v| v == name)
                .map(|i| HostValue::Enum(i as u16)),
            _ => None,
        }
    }

    /// Serialized name of a value of this property
    pub fn value_name(&self, value: &HostValue) -> Option<String> {
        match (&self.kind, value) {
            (HostPropertyKind::Enum(values), HostValue::Enum(i)) => {
                values.get(*i as usize).cloned()
            }
            (_, HostValue::Bool(b)) => Some(b.to_string()),
            (_, HostValue::Direction(d)) => Some(d.serialized_name().to_string()),
            (_, HostValue::Int(i)) => Some(i.to_string()),
            _ => None,
        }
    }
}

/// Behaviour flags the reference host consults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockFlags {
    /// Needs a non-air block below to survive
    pub needs_support: bool,
    /// Block entity holds clearable contents
    pub container: bool,
    /// Right-clicking the block consumes the action
    pub interactive: bool,
}

/// Host block type
#[derive(Debug)]
pub struct HostBlock {
    key: String,
    properties: Vec<Arc<HostProperty>>,
    defaults: Vec<HostValue>,
    flags: BlockFlags,
}

impl HostBlock {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            properties: Vec::new(),
            defaults: Vec::new(),
            flags: BlockFlags::default(),
        }
    }

    /// Declares a property; the default must be one of its possible values
    pub fn with_property(mut self, property: Arc<HostProperty>, default: HostValue) -> Self {
        self.properties.push(property);
        self.defaults.push(default);
        self
    }

    pub fn with_flags(mut self, flags: BlockFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    pub fn properties(&self) -> &[Arc<HostProperty>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Arc<HostProperty>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn default_state(self: &Arc<Self>) -> HostBlockState {
        HostBlockState {
            block: Arc::clone(self),
            values: self.defaults.clone(),
        }
    }

    /// Every combination of property values, defaults first
    pub fn all_states(self: &Arc<Self>) -> Vec<HostBlockState> {
        let mut states = vec![self.default_state()];
        for (index, property) in self.properties.iter().enumerate() {
            let mut expanded = Vec::with_capacity(states.len() * property.possible_values().len());
            for state in &states {
                for value in property.possible_values() {
                    let mut values = state.values.clone();
                    values[index] = value;
                    expanded.push(HostBlockState {
                        block: Arc::clone(self),
                        values,
                    });
                }
            }
            states = expanded;
        }
        if let Some(pos) = states.iter().position(|s| s.values == self.defaults) {
            let default = states.remove(pos);
            states.insert(0, default);
        }
        states
    }
}

/// Host block type plus one value per declared property
#[derive(Debug, Clone)]
pub struct HostBlockState {
    block: Arc<HostBlock>,
    values: Vec<HostValue>,
}

impl HostBlockState {
    pub fn block(&self) -> &Arc<HostBlock> {
        &self.block
    }

    pub fn get_value(&self, name: &str) -> Option<HostValue> {
        self.block
            .properties
            .iter()
            .position(|p| p.name() == name)
            .map(|i| self.values[i])
    }

    /// Returns a new state, or None if the property or value is foreign to this block
    pub fn set_value(&self, property: &HostProperty, value: HostValue) -> Option<HostBlockState> {
        let index = self
            .block
            .properties
            .iter()
            .position(|p| std::ptr::eq(p.as_ref(), property))?;
        if !property.is_valid(&value) {
            return None;
        }
        let mut values = self.values.clone();
        values[index] = value;
        Some(HostBlockState {
            block: Arc::clone(&self.block),
            values,
        })
    }

    pub fn values(&self) -> impl Iterator<Item = (&Arc<HostProperty>, &HostValue)> {
        self.block.properties.iter().zip(self.values.iter())
    }

    pub fn is_air(&self) -> bool {
        self.block.key == crate::constants::DEFAULT_BLOCK_KEY
    }
}

impl PartialEq for HostBlockState {
    fn eq(&self, other: &Self) -> bool {
        self.block.key == other.block.key && self.values == other.values
    }
}

impl Eq for HostBlockState {}

impl Hash for HostBlockState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.block.key.hash(state);
        self.values.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lever() -> Arc<HostBlock> {
        HostBlock::new("minecraft:lever")
            .with_property(
                HostProperty::enumeration("face", &["floor", "wall", "ceiling"]),
                HostValue::Enum(1),
            )
            .with_property(
                HostProperty::direction("facing", &HostDirection::HORIZONTAL),
                HostValue::Direction(HostDirection::North),
            )
            .with_property(HostProperty::boolean("powered"), HostValue::Bool(false))
            .build()
    }

    #[test]
    fn test_handles_are_stable_and_distinct() {
        let a = HostProperty::boolean("powered");
        let b = HostProperty::boolean("powered");
        assert_eq!(a.handle(), a.handle());
        assert_ne!(a.handle(), b.handle());
    }

    #[test]
    fn test_set_value_rejects_foreign_property() {
        let block = lever();
        let state = block.default_state();
        let stranger = HostProperty::boolean("powered");
        assert!(state.set_value(&stranger, HostValue::Bool(true)).is_none());

        let powered = block.property("powered").unwrap();
        let on = state.set_value(powered, HostValue::Bool(true)).unwrap();
        assert_eq!(on.get_value("powered"), Some(HostValue::Bool(true)));
        assert!(on.set_value(powered, HostValue::Int(3)).is_none());
    }

    #[test]
    fn test_all_states_enumerates_product() {
        let block = lever();
        let states = block.all_states();
        assert_eq!(states.len(), 3 * 4 * 2);
        assert_eq!(states[0], block.default_state());
    }

    #[test]
    fn test_enum_lookup_is_exact() {
        let face = HostProperty::enumeration("face", &["floor", "wall"]);
        assert_eq!(face.enum_value("wall"), Some(HostValue::Enum(1)));
        assert_eq!(face.enum_value("WALL"), None);
        assert_eq!(face.value_name(&HostValue::Enum(0)).as_deref(), Some("floor"));
    }
}
