use crate::ecs::component::ComponentMask;
use crate::ecs::error::Result;
use crate::ecs::world::World;

/// A system update: borrow the world, do one step of `dt` seconds.
pub type SystemFn = fn(&mut World, f64) -> Result<()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    Ai,
    ScriptedFlight,
    Control,
    Thrusters,
    Physics,
    Collision,
    Camera,
}

/// Execution order within a tick. This is a hard contract: commands written
/// by agents are shaped by control, turned into forces, and integrated in
/// the same frame, before pose is read by downstream consumers.
pub const EXECUTION_ORDER: [SystemKind; 7] = [
    SystemKind::Ai,
    SystemKind::ScriptedFlight,
    SystemKind::Control,
    SystemKind::Thrusters,
    SystemKind::Physics,
    SystemKind::Collision,
    SystemKind::Camera,
];

/// Upper bound on catch-up fires per system per tick; backlog beyond it is
/// dropped so a long frame cannot snowball into longer frames.
pub const MAX_CATCH_UP: u32 = 4;

const FIRE_EPSILON: f64 = 1e-9;

/// Distance-scaled update frequency for far-away agents.
#[derive(Debug, Clone, Copy)]
pub struct LodPolicy {
    /// Distance at or inside which the system runs at `near_hz` [m]
    pub near_distance: f64,
    /// Distance at or beyond which the system runs at `far_hz` [m]
    pub far_distance: f64,
    pub near_hz: f64,
    pub far_hz: f64,
}

impl LodPolicy {
    /// The 2–10 Hz band used for AI agents.
    pub fn ai_default() -> Self {
        Self {
            near_distance: 100.0,
            far_distance: 2000.0,
            near_hz: 10.0,
            far_hz: 2.0,
        }
    }

    pub fn frequency_for(&self, distance: f64) -> f64 {
        if !distance.is_finite() {
            return self.far_hz;
        }
        let span = self.far_distance - self.near_distance;
        if span <= 0.0 {
            return self.near_hz;
        }
        let t = ((distance - self.near_distance) / span).clamp(0.0, 1.0);
        self.near_hz + (self.far_hz - self.near_hz) * t
    }
}

struct SystemSlot {
    kind: SystemKind,
    update: SystemFn,
    frequency_hz: f64,
    lod: Option<LodPolicy>,
    accumulator: f64,
    period: f64,
    fire_count: u64,
}

/// Runs registered systems at their declared frequencies. Time is fed in via
/// `tick(real_dt)`; each system accumulates it and fires whenever a full
/// period is banked, receiving that period as its delta — the interval since
/// its own previous fire, never the raw frame delta.
pub struct Scheduler {
    slots: Vec<SystemSlot>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Scheduler preloaded with the six core systems: scripted flight,
    /// control, thrusters, physics and camera at the reference rate,
    /// collision at a third of it.
    pub fn with_core_systems(world: &World) -> Self {
        let rate = world.config().reference_rate_hz;
        let mut scheduler = Self::new();
        scheduler.register(
            SystemKind::ScriptedFlight,
            rate,
            crate::systems::scripted_flight_system,
        );
        scheduler.register(SystemKind::Control, rate, crate::systems::control_system);
        scheduler.register(SystemKind::Thrusters, rate, crate::systems::thruster_system);
        scheduler.register(SystemKind::Physics, rate, crate::systems::physics_system);
        scheduler.register(
            SystemKind::Collision,
            rate / 3.0,
            crate::systems::collision_system,
        );
        scheduler.register(SystemKind::Camera, rate, crate::systems::camera_system);
        scheduler
    }

    /// Register or replace the system for `kind`. A frequency of zero
    /// disables it.
    pub fn register(&mut self, kind: SystemKind, frequency_hz: f64, update: SystemFn) {
        self.register_with_lod(kind, frequency_hz, None, update);
    }

    pub fn register_with_lod(
        &mut self,
        kind: SystemKind,
        frequency_hz: f64,
        lod: Option<LodPolicy>,
        update: SystemFn,
    ) {
        self.slots.retain(|slot| slot.kind != kind);
        self.slots.push(SystemSlot {
            kind,
            update,
            frequency_hz: if frequency_hz.is_finite() { frequency_hz.max(0.0) } else { 0.0 },
            lod,
            accumulator: 0.0,
            period: f64::INFINITY,
            fire_count: 0,
        });
        self.slots.sort_by_key(|slot| order_index(slot.kind));
    }

    pub fn set_frequency(&mut self, kind: SystemKind, frequency_hz: f64) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.kind == kind) {
            slot.frequency_hz = if frequency_hz.is_finite() { frequency_hz.max(0.0) } else { 0.0 };
            if slot.frequency_hz == 0.0 {
                slot.accumulator = 0.0;
            }
        }
    }

    /// Fires of `kind` since registration.
    pub fn fire_count(&self, kind: SystemKind) -> u64 {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)
            .map_or(0, |slot| slot.fire_count)
    }

    /// Advance the schedule by one frame of wall-clock time. Deferred world
    /// mutations queued during the previous tick are applied first, so no
    /// system ever observes a mid-tick despawn.
    pub fn tick(&mut self, world: &mut World, real_dt: f64) {
        if !real_dt.is_finite() || real_dt < 0.0 {
            log::warn!("scheduler tick rejected non-finite or negative dt {real_dt}");
            return;
        }

        world.apply_deferred();
        world.advance_clock(real_dt);

        let ai_distance = nearest_agent_distance(world);
        for slot in &mut self.slots {
            let frequency = match slot.lod {
                Some(policy) => policy.frequency_for(ai_distance),
                None => slot.frequency_hz,
            };
            if frequency > 0.0 && slot.frequency_hz > 0.0 {
                slot.period = 1.0 / frequency;
                slot.accumulator += real_dt;
            } else {
                slot.period = f64::INFINITY;
                slot.accumulator = 0.0;
            }
        }

        let mut physics_fired = false;
        for _ in 0..MAX_CATCH_UP {
            let mut fired_any = false;
            for slot in &mut self.slots {
                if slot.accumulator + FIRE_EPSILON < slot.period {
                    continue;
                }
                slot.accumulator -= slot.period;
                slot.fire_count += 1;
                fired_any = true;
                if slot.kind == SystemKind::Physics {
                    physics_fired = true;
                }
                if let Err(err) = (slot.update)(world, slot.period) {
                    log::warn!("{:?} system failed, skipped for this tick: {err}", slot.kind);
                }
            }
            if !fired_any {
                break;
            }
        }

        // Drop backlog past one period so a stall does not replay itself.
        for slot in &mut self.slots {
            if slot.period.is_finite() && slot.accumulator > slot.period {
                slot.accumulator = slot.period;
            }
        }

        if physics_fired {
            world.publish_transforms();
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn order_index(kind: SystemKind) -> usize {
    EXECUTION_ORDER
        .iter()
        .position(|&k| k == kind)
        .unwrap_or(EXECUTION_ORDER.len())
}

/// Distance from the player to the nearest scripted agent, for LOD-scaled
/// slots. Infinite when there is no player or no agent.
fn nearest_agent_distance(world: &World) -> f64 {
    let player = world.player_entity();
    let Ok(player_transform) = world.get_transform(player) else {
        return f64::INFINITY;
    };
    let origin = player_transform.position;

    let mut nearest = f64::INFINITY;
    for entity in
        world.entities_with(ComponentMask::SCRIPTED_FLIGHT | ComponentMask::TRANSFORM)
    {
        if entity == player {
            continue;
        }
        if let Ok(transform) = world.get_transform(entity) {
            nearest = nearest.min((transform.position - origin).norm());
        }
    }
    nearest
}
