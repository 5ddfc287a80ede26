use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional consequence of a block mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SideEffect {
    Lighting,
    Neighbors,
    Update,
    Validation,
    EntityAi,
    Events,
    PoiUpdate,
    Network,
    History,
    Heightmaps,
}

/// Side effects the bridge can honour on this host
pub const SUPPORTED_SIDE_EFFECTS: [SideEffect; 6] = [
    SideEffect::Neighbors,
    SideEffect::Lighting,
    SideEffect::Validation,
    SideEffect::EntityAi,
    SideEffect::Events,
    SideEffect::Update,
];

impl SideEffect {
    pub const ALL: [SideEffect; 10] = [
        SideEffect::Lighting,
        SideEffect::Neighbors,
        SideEffect::Update,
        SideEffect::Validation,
        SideEffect::EntityAi,
        SideEffect::Events,
        SideEffect::PoiUpdate,
        SideEffect::Network,
        SideEffect::History,
        SideEffect::Heightmaps,
    ];

    pub fn is_supported(&self) -> bool {
        SUPPORTED_SIDE_EFFECTS.contains(self)
    }
}

/// Caller's opt-in/opt-out selection of side effects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideEffectSet {
    states: BTreeMap<SideEffect, bool>,
}

impl SideEffectSet {
    pub fn none() -> Self {
        Self::default()
    }

    /// Every side effect the host supports, switched on
    pub fn supported_only() -> Self {
        let mut set = Self::none();
        for effect in SUPPORTED_SIDE_EFFECTS {
            set.states.insert(effect, true);
        }
        set
    }

    pub fn with(mut self, effect: SideEffect, enabled: bool) -> Self {
        self.states.insert(effect, enabled);
        self
    }

    pub fn should_apply(&self, effect: SideEffect) -> bool {
        self.states.get(&effect).copied().unwrap_or(false)
    }

    /// Requested effects the host cannot honour
    pub fn unsupported(&self) -> Vec<SideEffect> {
        self.states
            .iter()
            .filter(|(effect, enabled)| **enabled && !effect.is_supported())
            .map(|(effect, _)| *effect)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_set_is_fixed() {
        assert_eq!(SUPPORTED_SIDE_EFFECTS.len(), 6);
        assert!(!SideEffect::Network.is_supported());
        assert!(SideEffect::EntityAi.is_supported());
    }

    #[test]
    fn test_selective_request() {
        let set = SideEffectSet::supported_only()
            .with(SideEffect::Lighting, false)
            .with(SideEffect::History, true);
        assert!(!set.should_apply(SideEffect::Lighting));
        assert!(set.should_apply(SideEffect::Neighbors));
        assert_eq!(set.unsupported(), vec![SideEffect::History]);
    }
}
