use crate::components::{
    CollisionComponent, CollisionEvent, ControlAuthority, FlightCamera, PhysicsComponent, Player,
    Renderable, ScriptedFlight, Thruster, Transform,
};
use crate::config::SimConfig;
use crate::ecs::component::{ComponentKind, ComponentMask, ComponentPool};
use crate::ecs::entity::{EntityId, EntityManager, INVALID_ENTITY};
use crate::ecs::error::{EcsError, Result};
use crate::input::InputState;
use nalgebra::{UnitQuaternion, Vector3};

/// One dense pool per component kind.
#[derive(Default)]
pub(crate) struct ComponentSet {
    pub(crate) transforms: ComponentPool<Transform>,
    pub(crate) physics: ComponentPool<PhysicsComponent>,
    pub(crate) thrusters: ComponentPool<Thruster>,
    pub(crate) control: ComponentPool<ControlAuthority>,
    pub(crate) scripted: ComponentPool<ScriptedFlight>,
    pub(crate) renderables: ComponentPool<Renderable>,
    pub(crate) cameras: ComponentPool<FlightCamera>,
    pub(crate) collisions: ComponentPool<CollisionComponent>,
    pub(crate) players: ComponentPool<Player>,
}

/// Pose published for renderers after a physics tick; readers never see a
/// transform mid-integration.
#[derive(Debug, Clone, Copy)]
pub struct TransformSample {
    pub entity: EntityId,
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

/// Disjoint borrows handed to systems: the entity set read-only, the pools
/// mutable, plus the per-tick context.
pub(crate) struct WorldParts<'a> {
    pub entities: &'a EntityManager,
    pub components: &'a mut ComponentSet,
    pub input: &'a InputState,
    pub player_entity: EntityId,
    pub elapsed: f64,
    pub config: &'a SimConfig,
    pub collision_events: &'a mut Vec<CollisionEvent>,
}

/// The world owns all entities and component data, the input snapshot, and
/// the player designation. Systems borrow it mutably one at a time; nothing
/// in the core touches it from more than one thread.
pub struct World {
    entities: EntityManager,
    components: ComponentSet,
    config: SimConfig,
    input: InputState,
    player_entity: EntityId,
    elapsed: f64,
    collision_events: Vec<CollisionEvent>,
    pending_despawns: Vec<EntityId>,
    snapshot: Vec<TransformSample>,
}

macro_rules! component_api {
    ($field:ident, $ty:ty, $kind:expr, $insert:ident, $get:ident, $get_mut:ident, $remove:ident) => {
        pub fn $insert(&mut self, entity: EntityId, component: $ty) -> Result<()> {
            match self.entities.mask_mut(entity) {
                Some(mask) => {
                    mask.insert($kind.mask());
                    self.components.$field.insert(entity, component);
                    Ok(())
                }
                None => Err(EcsError::InvalidEntity(entity)),
            }
        }

        pub fn $get(&self, entity: EntityId) -> Result<&$ty> {
            if !self.entities.is_alive(entity) {
                return Err(EcsError::InvalidEntity(entity));
            }
            self.components.$field.get(entity).ok_or(EcsError::MissingComponent {
                entity,
                kind: $kind,
            })
        }

        pub fn $get_mut(&mut self, entity: EntityId) -> Result<&mut $ty> {
            if !self.entities.is_alive(entity) {
                return Err(EcsError::InvalidEntity(entity));
            }
            self.components.$field.get_mut(entity).ok_or(EcsError::MissingComponent {
                entity,
                kind: $kind,
            })
        }

        /// Returns whether the component was present.
        pub fn $remove(&mut self, entity: EntityId) -> Result<bool> {
            match self.entities.mask_mut(entity) {
                Some(mask) => {
                    mask.remove($kind.mask());
                    Ok(self.components.$field.remove(entity).is_some())
                }
                None => Err(EcsError::InvalidEntity(entity)),
            }
        }
    };
}

impl World {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            entities: EntityManager::new(config.max_entities),
            components: ComponentSet::default(),
            config,
            input: InputState::default(),
            player_entity: INVALID_ENTITY,
            elapsed: 0.0,
            collision_events: Vec::new(),
            pending_despawns: Vec::new(),
            snapshot: Vec::new(),
        }
    }

    // ---- entity lifecycle ----

    pub fn spawn(&mut self) -> Result<EntityId> {
        self.entities.create()
    }

    /// Destroy an entity, releasing its component slots in reverse
    /// dependency order. Idempotent: false on stale or invalid ids.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.components.scripted.remove(entity);
        self.components.control.remove(entity);
        self.components.thrusters.remove(entity);
        self.components.physics.remove(entity);
        self.components.transforms.remove(entity);
        self.components.renderables.remove(entity);
        self.components.cameras.remove(entity);
        self.components.collisions.remove(entity);
        self.components.players.remove(entity);
        if self.player_entity == entity {
            self.player_entity = INVALID_ENTITY;
        }
        self.entities.remove(entity)
    }

    /// Request a despawn from inside a tick; applied between ticks by the
    /// scheduler.
    pub fn queue_despawn(&mut self, entity: EntityId) {
        if self.entities.is_alive(entity) && !self.pending_despawns.contains(&entity) {
            self.pending_despawns.push(entity);
        }
    }

    pub(crate) fn apply_deferred(&mut self) {
        let pending = std::mem::take(&mut self.pending_despawns);
        for entity in pending {
            self.despawn(entity);
        }
    }

    #[inline]
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.is_alive(entity)
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Despawn everything and invalidate all outstanding ids. Config is
    /// kept; clock and queues are reset.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.transforms.clear();
        self.components.physics.clear();
        self.components.thrusters.clear();
        self.components.control.clear();
        self.components.scripted.clear();
        self.components.renderables.clear();
        self.components.cameras.clear();
        self.components.collisions.clear();
        self.components.players.clear();
        self.collision_events.clear();
        self.pending_despawns.clear();
        self.snapshot.clear();
        self.player_entity = INVALID_ENTITY;
        self.elapsed = 0.0;
    }

    // ---- component mask operations ----

    #[inline]
    pub fn component_mask(&self, entity: EntityId) -> ComponentMask {
        self.entities.mask(entity)
    }

    #[inline]
    pub fn has_component(&self, entity: EntityId, kind: ComponentKind) -> bool {
        self.entities.mask(entity).contains(kind.mask())
    }

    /// Default-insert a component by kind. Returns whether it was newly
    /// added; an already-present component is a successful no-op.
    pub fn add_component(&mut self, entity: EntityId, kind: ComponentKind) -> Result<bool> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }
        if self.has_component(entity, kind) {
            return Ok(false);
        }
        match kind {
            ComponentKind::Transform => self.insert_transform(entity, Transform::default())?,
            ComponentKind::Physics => self.insert_physics(entity, PhysicsComponent::default())?,
            ComponentKind::Thruster => self.insert_thruster(entity, Thruster::default())?,
            ComponentKind::ControlAuthority => {
                self.insert_control_authority(entity, ControlAuthority::default())?
            }
            ComponentKind::ScriptedFlight => {
                self.insert_scripted_flight(entity, ScriptedFlight::default())?
            }
            ComponentKind::Renderable => self.insert_renderable(entity, Renderable::default())?,
            ComponentKind::Camera => self.insert_camera(entity, FlightCamera::default())?,
            ComponentKind::Collision => {
                self.insert_collision(entity, CollisionComponent::default())?
            }
            ComponentKind::Player => self.insert_player(entity, Player)?,
        }
        Ok(true)
    }

    /// Remove a component by kind. Returns whether it was present.
    pub fn remove_component(&mut self, entity: EntityId, kind: ComponentKind) -> Result<bool> {
        match kind {
            ComponentKind::Transform => self.remove_transform(entity),
            ComponentKind::Physics => self.remove_physics(entity),
            ComponentKind::Thruster => self.remove_thruster(entity),
            ComponentKind::ControlAuthority => self.remove_control_authority(entity),
            ComponentKind::ScriptedFlight => self.remove_scripted_flight(entity),
            ComponentKind::Renderable => self.remove_renderable(entity),
            ComponentKind::Camera => self.remove_camera(entity),
            ComponentKind::Collision => self.remove_collision(entity),
            ComponentKind::Player => self.remove_player(entity),
        }
    }

    // ---- typed accessors ----

    component_api!(
        transforms,
        Transform,
        ComponentKind::Transform,
        insert_transform,
        get_transform,
        get_transform_mut,
        remove_transform
    );
    component_api!(
        physics,
        PhysicsComponent,
        ComponentKind::Physics,
        insert_physics,
        get_physics,
        get_physics_mut,
        remove_physics
    );
    component_api!(
        thrusters,
        Thruster,
        ComponentKind::Thruster,
        insert_thruster,
        get_thruster,
        get_thruster_mut,
        remove_thruster
    );
    component_api!(
        control,
        ControlAuthority,
        ComponentKind::ControlAuthority,
        insert_control_authority,
        get_control_authority,
        get_control_authority_mut,
        remove_control_authority
    );
    component_api!(
        scripted,
        ScriptedFlight,
        ComponentKind::ScriptedFlight,
        insert_scripted_flight,
        get_scripted_flight,
        get_scripted_flight_mut,
        remove_scripted_flight
    );
    component_api!(
        renderables,
        Renderable,
        ComponentKind::Renderable,
        insert_renderable,
        get_renderable,
        get_renderable_mut,
        remove_renderable
    );
    component_api!(
        cameras,
        FlightCamera,
        ComponentKind::Camera,
        insert_camera,
        get_camera,
        get_camera_mut,
        remove_camera
    );
    component_api!(
        collisions,
        CollisionComponent,
        ComponentKind::Collision,
        insert_collision,
        get_collision,
        get_collision_mut,
        remove_collision
    );
    component_api!(
        players,
        Player,
        ComponentKind::Player,
        insert_player,
        get_player,
        get_player_mut,
        remove_player
    );

    // ---- iteration ----

    /// Live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    /// Live entities owning every kind in `mask`, in slot order, without
    /// allocating.
    pub fn entities_with(&self, mask: ComponentMask) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .filter(move |&entity| self.entities.mask(entity).contains(mask))
    }

    // ---- frame context ----

    /// Atomically replace the input snapshot; called at most once per frame
    /// by the input collaborator, before the scheduler tick.
    pub fn set_input_state(&mut self, snapshot: InputState) {
        self.input = snapshot.sanitized();
    }

    #[inline]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    /// Designate the entity whose control authority is filled from the
    /// input snapshot.
    pub fn set_player_entity(&mut self, entity: EntityId) {
        self.player_entity = entity;
    }

    #[inline]
    pub fn player_entity(&self) -> EntityId {
        self.player_entity
    }

    /// Simulated time advanced by the scheduler [s].
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub(crate) fn advance_clock(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // ---- collision events ----

    pub fn collision_events(&self) -> &[CollisionEvent] {
        &self.collision_events
    }

    pub fn drain_collision_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.collision_events)
    }

    // ---- render snapshot ----

    /// Copy every transform into the published snapshot. The scheduler does
    /// this after the last physics fire of a tick.
    pub fn publish_transforms(&mut self) {
        self.snapshot.clear();
        for entity in self.entities.iter() {
            if let Some(transform) = self.components.transforms.get(entity) {
                self.snapshot.push(TransformSample {
                    entity,
                    position: transform.position,
                    rotation: transform.rotation,
                    scale: transform.scale,
                });
            }
        }
    }

    /// The poses published by the last `publish_transforms`; stable until
    /// the next publication.
    pub fn render_snapshot(&self) -> &[TransformSample] {
        &self.snapshot
    }

    pub(crate) fn parts_mut(&mut self) -> WorldParts<'_> {
        WorldParts {
            entities: &self.entities,
            components: &mut self.components,
            input: &self.input,
            player_entity: self.player_entity,
            elapsed: self.elapsed,
            config: &self.config,
            collision_events: &mut self.collision_events,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
