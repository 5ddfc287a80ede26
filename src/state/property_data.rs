//! Neutral property vocabulary - Pure Data

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::core::Direction;

/// What kind of values a property ranges over, with the values in host order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Boolean(Vec<bool>),
    Directional(Vec<Direction>),
    /// Serialized names, exactly as the host spells them
    Enum(Vec<String>),
    Integer(Vec<i32>),
}

impl PropertyKind {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Boolean(_) => "boolean",
            PropertyKind::Directional(_) => "direction",
            PropertyKind::Enum(_) => "enum",
            PropertyKind::Integer(_) => "integer",
        }
    }
}

/// Neutral description of one block-state axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn accepts(&self, value: &PropertyValue) -> bool {
        match (&self.kind, value) {
            (PropertyKind::Boolean(values), PropertyValue::Bool(v)) => values.contains(v),
            (PropertyKind::Directional(values), PropertyValue::Direction(v)) => values.contains(v),
            (PropertyKind::Enum(values), PropertyValue::Enum(v)) => values.contains(v),
            (PropertyKind::Integer(values), PropertyValue::Int(v)) => values.contains(v),
            _ => false,
        }
    }

    /// Parses a serialized value of this property
    pub fn parse_value(&self, text: &str) -> Option<PropertyValue> {
        let value = match &self.kind {
            PropertyKind::Boolean(_) => PropertyValue::Bool(text.parse().ok()?),
            PropertyKind::Directional(_) => {
                PropertyValue::Direction(Direction::from_name(&text.to_uppercase())?)
            }
            PropertyKind::Enum(_) => PropertyValue::Enum(text.to_string()),
            PropertyKind::Integer(_) => PropertyValue::Int(text.parse().ok()?),
        };
        self.accepts(&value).then_some(value)
    }
}

/// One concrete value of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Direction(Direction),
    Enum(String),
    Int(i32),
}

impl PropertyValue {
    pub fn kind_label(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "boolean",
            PropertyValue::Direction(_) => "direction",
            PropertyValue::Enum(_) => "enum",
            PropertyValue::Int(_) => "integer",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Direction(d) => write!(f, "{}", d.name().to_lowercase()),
            PropertyValue::Enum(name) => write!(f, "{}", name),
            PropertyValue::Int(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_respects_domain() {
        let age = PropertyDescriptor::new("age", PropertyKind::Integer((0..=7).collect()));
        assert_eq!(age.parse_value("3"), Some(PropertyValue::Int(3)));
        assert_eq!(age.parse_value("8"), None);

        let facing = PropertyDescriptor::new(
            "facing",
            PropertyKind::Directional(vec![Direction::North, Direction::South]),
        );
        assert_eq!(
            facing.parse_value("north"),
            Some(PropertyValue::Direction(Direction::North))
        );
        assert_eq!(facing.parse_value("east"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(PropertyValue::Direction(Direction::NorthEast).to_string(), "northeast");
        assert_eq!(PropertyValue::Enum("wall".into()).to_string(), "wall");
    }
}
