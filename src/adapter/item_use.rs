//! Simulated item use
//!
//! Each loaded world gets one fake actor, created on first use. Actors are
//! keyed by world identity and held only as long as their world is alive.

use dashmap::DashMap;
use lazy_static::lazy_static;
use std::sync::Weak;

use crate::error::{BridgeError, BridgeResult};
use crate::host::{BlockHit, FakeActor, HostItemStack, HostServer, HostWorld, InteractionResult};
use crate::state::{adapt_direction, to_host_item, BaseItemStack};
use crate::world::core::{BlockPos, Direction, Location};

struct CachedActor {
    world: Weak<()>,
    actor: FakeActor,
}

lazy_static! {
    static ref FAKE_ACTORS: DashMap<u64, CachedActor> = DashMap::new();
}

/// Drops the actors of worlds that have been unloaded; returns how many
pub fn release_unloaded_actors() -> usize {
    let mut released = 0;
    FAKE_ACTORS.retain(|_, cached| {
        let alive = cached.world.strong_count() > 0;
        if !alive {
            released += 1;
        }
        alive
    });
    if released > 0 {
        log::debug!("[ItemUse::release] Released {} fake actors", released);
    }
    released
}

/// Positions the world's fake actor and hands it the stack
fn prepare_actor(world: &dyn HostWorld, location: Location, stack: HostItemStack) -> FakeActor {
    release_unloaded_actors();
    let token = world.token();
    let mut cached = FAKE_ACTORS.entry(token.id()).or_insert_with(|| {
        log::debug!(
            "[ItemUse::prepare_actor] New fake actor for '{}' (#{})",
            world.name(),
            token.id()
        );
        CachedActor {
            world: token.watch(),
            actor: FakeActor::new(world.name()),
        }
    });
    cached.actor.location = location;
    cached.actor.main_hand = Some(stack);
    cached.actor.clone()
}

/// Uses `item` against the block at `pos`, hitting its `face`
///
/// Tries the item on the block first, then the block itself, then the item
/// on its own. True only if the final outcome is a success.
pub fn simulate_item_use(
    server: &dyn HostServer,
    world: &dyn HostWorld,
    pos: BlockPos,
    item: &BaseItemStack,
    face: Direction,
) -> BridgeResult<bool> {
    let Some(stack) = to_host_item(server, item)? else {
        log::debug!("[ItemUse::simulate] Unknown item '{}'", item.item_type);
        return Ok(false);
    };
    let host_face = adapt_direction(face).ok_or_else(|| BridgeError::InvalidPropertyValue {
        property: "face".to_string(),
        value: face.name().to_lowercase(),
    })?;

    let location = pos.to_location().with_rotation(face.to_yaw(), face.to_pitch());
    let actor = prepare_actor(world, location, stack.clone());
    let hit = BlockHit { pos, face: host_face };

    let mut result = world.use_item_on(&actor, &stack, hit);
    if result != InteractionResult::Success {
        result = if world.use_block(&actor, hit).consumes_action() {
            InteractionResult::Success
        } else {
            world.use_item(&actor, &stack)
        };
    }
    Ok(result == InteractionResult::Success)
}
