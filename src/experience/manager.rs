use std::time::Instant;

use glam::{Quat, Vec3};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    attraction::attraction_impulse,
    bridge,
    choreographer::{ActiveSpring, SpringChoreographer, StarterSpring},
    clock::{SimulationClock, Stepper},
    events::{EventGateway, EventKind, ExperienceEvent, SubscriptionId},
    input::{self, CursorLatch, PlayerAction},
    message::{layout_message, MessageAnchor},
    reactor::{CollisionReactor, Reaction},
    registry::{
        derive_shape, ActuatorId, BodyEntry, BodyKind, BodyRegistry, BodyRole, ShapeKind, Tether,
        VisualDescriptor, VisualId, VisualObject,
    },
    scheduler::{Animation, Scheduler, TaskKey},
};
use crate::{
    config::{BodyOptions, ExperienceConfig, DEFAULT_DESKTOP_VIEWPOINT},
    core::{BodyHandle, ColliderShape, RigidBody},
    error::{ExperienceError, Result},
    utils::{
        logging::{FrameBudget, ScopedTimer},
        tween::Easing,
    },
    world::PhysicsWorld,
};

/// Which camera drives the collision sphere and the attraction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Desktop,
    Vr,
}

/// Outcome of one [`PhysicsManager::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub substeps: u32,
    pub events: Vec<ExperienceEvent>,
}

/// Bridge between the simulation and the scene, and driver of the letter
/// choreography.
///
/// The host registers its objects, writes actuator and viewpoint poses, then
/// calls [`update`](Self::update) once per rendered frame and reads the
/// visual state back.
pub struct PhysicsManager {
    config: ExperienceConfig,
    world: PhysicsWorld,
    registry: BodyRegistry,
    choreographer: SpringChoreographer,
    reactor: CollisionReactor,
    scheduler: Scheduler,
    clock: SimulationClock,
    stepper: Stepper,
    gateway: EventGateway,
    cursor: CursorLatch,
    frame_budget: FrameBudget,
    mode: ViewMode,
    desktop_viewpoint: Vec3,
    vr_viewpoint: Vec3,
    camera_body: BodyHandle,
    ground: BodyHandle,
    now_ms: f64,
}

impl PhysicsManager {
    pub fn new(config: ExperienceConfig) -> Result<Self> {
        config.validate()?;

        let mut world = PhysicsWorld::from_config(&config);
        let desktop_viewpoint = Vec3::from_array(DEFAULT_DESKTOP_VIEWPOINT);
        let camera_body = world.add_body(
            RigidBody::fixed(ColliderShape::sphere(config.camera_radius))
                .with_transform(bridge::to_simulation(desktop_viewpoint), Quat::IDENTITY),
        );
        let ground = world.add_ground_plane();

        Ok(Self {
            stepper: Stepper::new(config.time_step, config.max_sub_steps),
            choreographer: SpringChoreographer::new(config.springs),
            reactor: CollisionReactor::new(config.start_guard_ms),
            frame_budget: FrameBudget::new(config.frame_budget_ms),
            config,
            world,
            registry: BodyRegistry::new(),
            scheduler: Scheduler::new(),
            clock: SimulationClock::new(),
            gateway: EventGateway::new(),
            cursor: CursorLatch::new(),
            mode: ViewMode::Desktop,
            desktop_viewpoint,
            vr_viewpoint: desktop_viewpoint,
            camera_body,
            ground,
            now_ms: 0.0,
        })
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn camera_body(&self) -> BodyHandle {
        self.camera_body
    }

    pub fn ground(&self) -> BodyHandle {
        self.ground
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Sets the visual-space position of the camera used in `mode`.
    pub fn set_viewpoint(&mut self, mode: ViewMode, position: Vec3) {
        match mode {
            ViewMode::Desktop => self.desktop_viewpoint = position,
            ViewMode::Vr => self.vr_viewpoint = position,
        }
    }

    /// Visual-space position of the active camera.
    pub fn viewpoint(&self) -> Vec3 {
        match self.mode {
            ViewMode::Desktop => self.desktop_viewpoint,
            ViewMode::Vr => self.vr_viewpoint,
        }
    }

    /// Walls and ceiling around the play area, sized in visual axes
    /// (width, height, depth).
    pub fn set_closed_area(&mut self, x: f32, y: f32, z: f32) -> Vec<BodyHandle> {
        self.world.set_closed_area(x, y, z)
    }

    pub fn has_started(&self) -> bool {
        self.reactor.has_started()
    }

    pub fn letters_total(&self) -> usize {
        self.choreographer.letters_total()
    }

    pub fn set_letters_total(&mut self, total: usize) {
        self.choreographer.set_letters_total(total);
    }

    pub fn springed_count(&self) -> usize {
        self.choreographer.springed_count()
    }

    pub fn active_springs(&self) -> &[ActiveSpring] {
        self.choreographer.active_springs()
    }

    pub fn starter_spring(&self) -> Option<&StarterSpring> {
        self.choreographer.starter()
    }

    pub fn anchors(&self) -> &[MessageAnchor] {
        self.choreographer.anchors()
    }

    pub fn pending_animations(&self) -> usize {
        self.scheduler.len()
    }

    /// Frames that took longer than the configured budget.
    pub fn frame_overruns(&self) -> u64 {
        self.frame_budget.overruns()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    pub fn visuals(&self) -> impl Iterator<Item = &VisualObject> + '_ {
        self.registry.iter().map(|entry| &entry.visual)
    }

    pub fn visual(&self, id: VisualId) -> Option<&VisualObject> {
        self.registry.entry_for_visual(id).map(|entry| &entry.visual)
    }

    /// The visual paired with `body`, or `None` for an unregistered body.
    pub fn visual_for_body(&self, body: BodyHandle) -> Option<&VisualObject> {
        self.registry.visual_for_body(body)
    }

    pub fn role_of(&self, body: BodyHandle) -> Option<BodyRole> {
        self.registry.entry_for_body(body).map(|entry| entry.role)
    }

    pub fn body_for_visual(&self, id: VisualId) -> Option<BodyHandle> {
        self.registry.entry_for_visual(id).map(|entry| entry.body)
    }

    /// Writes the scene pose of a visual; actuators read it on the next sync.
    pub fn set_visual_pose(&mut self, id: VisualId, position: Vec3, rotation: Quat) -> Result<()> {
        let entry = self
            .registry
            .entry_for_visual_mut(id)
            .ok_or(ExperienceError::UnknownVisual(id))?;
        entry.visual.position = position;
        entry.visual.rotation = rotation;
        Ok(())
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: FnMut(&ExperienceEvent) + Send + 'static,
    {
        self.gateway.subscribe(kind, callback)
    }

    pub fn subscribe_all<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ExperienceEvent) + Send + 'static,
    {
        self.gateway.subscribe_all(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.gateway.unsubscribe(id)
    }

    /// Registers the box that starts the experience and tethers it to the
    /// starter anchor.
    pub fn register_starter(&mut self, descriptor: VisualDescriptor) -> Result<BodyHandle> {
        if self.registry.has_starter() {
            return Err(ExperienceError::StarterAlreadyRegistered);
        }

        let shape = derive_shape(ShapeKind::Box, &descriptor)?;
        let handle = self.insert(descriptor, shape, BodyOptions::floating(), BodyRole::Starter);
        self.choreographer.tether_starter(handle);
        debug!("Registered starter {handle}");
        Ok(handle)
    }

    /// Creates the body of a visual object and pairs them.
    ///
    /// Without `options`, actuators are massless and every other body floats
    /// with the default mass and angular damping. Sphere actuators push
    /// bodies around but never trigger the game rules.
    pub fn register(
        &mut self,
        descriptor: VisualDescriptor,
        shape_kind: ShapeKind,
        kind: BodyKind,
        options: Option<BodyOptions>,
    ) -> Result<BodyHandle> {
        let shape = derive_shape(shape_kind, &descriptor)?;
        let (role, default_options) = match kind {
            BodyKind::Actuator(actuator) => (
                BodyRole::Actuator {
                    actuator,
                    reacts_to_contact: shape_kind != ShapeKind::Sphere,
                },
                BodyOptions::kinematic(),
            ),
            BodyKind::Springable => (
                BodyRole::Letter {
                    spring_target: descriptor.spring_target,
                    tether: Tether::Free,
                },
                BodyOptions::floating(),
            ),
            BodyKind::Decoration => (BodyRole::Decoration, BodyOptions::floating()),
        };

        let handle = self.insert(descriptor, shape, options.unwrap_or(default_options), role);
        debug!("Registered {handle} as {role:?}");
        Ok(handle)
    }

    /// Generates one anchor per non-space character and returns their
    /// indices in reading order. The letter total becomes the anchor count.
    pub fn set_message(&mut self, text: &str) -> Result<Vec<usize>> {
        let anchors = layout_message(text, &self.config.layout);
        let indices = anchors.iter().map(|anchor| anchor.index).collect();
        self.choreographer.set_anchors(anchors)?;
        info!("Message set with {} letters", self.choreographer.letters_total());
        Ok(indices)
    }

    /// Runs one frame at host time `timestamp_ms`.
    pub fn update(&mut self, timestamp_ms: f64) -> FrameReport {
        let frame_start = Instant::now();
        let _timer = ScopedTimer::new("experience::update");
        self.now_ms = timestamp_ms;

        let substeps = match self.clock.delta_seconds(timestamp_ms) {
            Some(dt) => self.stepper.advance(&mut self.world, dt),
            None => 0,
        };

        for event in self.world.drain_collision_events() {
            self.handle_collision(event.body_a, event.body_b);
        }

        self.advance_animations(timestamp_ms);
        self.sync_viewpoint();
        self.sync_bodies();
        self.choreographer
            .apply_forces(&mut self.world, self.reactor.has_started());

        self.clock.record(timestamp_ms);
        let events = self.gateway.flush();

        self.frame_budget.record(frame_start.elapsed());
        FrameReport { substeps, events }
    }

    /// Applies the game rules to a contact between two bodies and returns
    /// the events it raised. Either side may be the actuator; contacts
    /// involving unknown bodies are ignored.
    pub fn handle_collision(&mut self, a: BodyHandle, b: BodyHandle) -> Vec<ExperienceEvent> {
        let queued = self.gateway.pending().len();
        self.react(a, b);
        self.react(b, a);
        self.gateway.pending()[queued..].to_vec()
    }

    /// Nudges every free, non-actuator body toward the active viewpoint.
    pub fn attract_all_to_player(&mut self) {
        let viewpoint = self.viewpoint();
        let force = self.config.attraction_force;

        for entry in self.registry.iter() {
            if entry.role.is_actuator() || entry.role.is_springing() {
                continue;
            }
            let Some(impulse) = attraction_impulse(
                entry.visual.position,
                viewpoint,
                force,
                entry.role.is_springable(),
            ) else {
                continue;
            };
            let Some(body) = self.world.body_mut(entry.body) else {
                continue;
            };
            if body.is_asleep() {
                continue;
            }

            let position = body.position();
            body.apply_local_impulse(impulse.local, position);
            body.apply_impulse(impulse.center, position);
        }
    }

    /// Pulls every free letter into the message without a strike.
    pub fn show_all(&mut self) {
        let candidates: Vec<(BodyHandle, usize)> = self
            .registry
            .iter()
            .filter(|entry| entry.role.is_springable() && !entry.role.is_starter())
            .filter(|entry| !entry.role.is_springing())
            .filter_map(|entry| entry.role.spring_target().map(|index| (entry.body, index)))
            .collect();

        for (body, anchor_index) in candidates {
            self.attach_spring(body, anchor_index);
        }
    }

    /// Drops every active spring. Reports `MessageUnlocked` when the message
    /// was complete at that moment.
    pub fn release_all(&mut self) {
        let release = self.choreographer.release_all();
        if release.unlocked {
            info!("Message unlocked");
            self.gateway.publish(ExperienceEvent::MessageUnlocked);
        }

        for active in &release.springs {
            self.scheduler.cancel(TaskKey::Spring(active.id));
            self.scheduler.cancel(TaskKey::Body(active.body));
            if let Some(entry) = self.registry.entry_for_body_mut(active.body) {
                entry.role.release();
            }
            if let Some(rigid) = self.world.body_mut(active.body) {
                rigid.linear_damping = active.free_linear_damping;
            }
        }
    }

    /// Routes a player action. Assembling and releasing only apply once the
    /// session has started.
    pub fn handle_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::Primary => self.attract_all_to_player(),
            PlayerAction::Assemble => {
                if self.has_started() {
                    self.show_all();
                }
            }
            PlayerAction::Cursor(signal) => {
                if self.cursor.signal(signal) && self.has_started() {
                    self.release_all();
                }
            }
        }
    }

    /// Desktop key press; returns whether the key is bound.
    pub fn handle_key(&mut self, key_code: u32) -> bool {
        match input::action_for_key(&self.config.keys, key_code) {
            Some(action) => {
                self.handle_action(action);
                true
            }
            None => false,
        }
    }

    fn insert(
        &mut self,
        descriptor: VisualDescriptor,
        shape: ColliderShape,
        options: BodyOptions,
        role: BodyRole,
    ) -> BodyHandle {
        let body = RigidBody::new(shape, options).with_transform(
            bridge::to_simulation(descriptor.position),
            bridge::rotation_to_simulation(descriptor.rotation),
        );
        let handle = self.world.add_body(body);
        self.registry.push(BodyEntry {
            body: handle,
            visual: VisualObject::new(descriptor.id, descriptor.position, descriptor.rotation),
            role,
        });
        handle
    }

    fn react(&mut self, actuator: BodyHandle, other: BodyHandle) {
        let (Some(actuator_entry), Some(other_entry)) = (
            self.registry.entry_for_body(actuator),
            self.registry.entry_for_body(other),
        ) else {
            return;
        };
        let BodyRole::Actuator {
            actuator: actuator_id,
            ..
        } = actuator_entry.role
        else {
            return;
        };

        match self
            .reactor
            .react(&actuator_entry.role, &other_entry.role, self.clock.elapsed_ms())
        {
            Reaction::Start => self.start(actuator_id),
            Reaction::Strike { spring_target } => {
                let visual = other_entry.visual.id;
                if self.attach_spring(other, spring_target) {
                    self.gateway.publish(ExperienceEvent::LetterHit {
                        visual,
                        actuator: actuator_id,
                    });
                }
            }
            Reaction::Ignore => {}
        }
    }

    fn start(&mut self, actuator: ActuatorId) {
        if !self.reactor.mark_started() {
            return;
        }
        info!("Experience started by {actuator}");

        if let Some(starter) = self.choreographer.detach_starter() {
            let from_opacity = match self.registry.entry_for_body_mut(starter.body) {
                Some(entry) => {
                    entry.visual.transparent = true;
                    entry.visual.opacity
                }
                None => 1.0,
            };
            self.scheduler.schedule(
                Animation::StarterFade {
                    body: starter.body,
                    from_opacity,
                },
                self.now_ms,
                self.config.animations.starter_fade_ms,
                Easing::Linear,
            );
        }

        self.gateway.publish(ExperienceEvent::Starts { actuator });
        self.attract_all_to_player();
    }

    /// Springs `body` to anchor `anchor_index` if it is a free letter and the
    /// anchor exists.
    fn attach_spring(&mut self, body: BodyHandle, anchor_index: usize) -> bool {
        if self.choreographer.anchor(anchor_index).is_none() {
            debug!("{body} targets unknown anchor {anchor_index}");
            return false;
        }
        let Some(rigid) = self.world.body(body) else {
            return false;
        };
        let Some(entry) = self.registry.entry_for_body_mut(body) else {
            return false;
        };
        if !entry.role.begin_springing() {
            return false;
        }
        let Some(active) = self.choreographer.attach(anchor_index, rigid) else {
            return false;
        };
        if let Some(rigid) = self.world.body_mut(body) {
            rigid.linear_damping = self.config.springs.tethered_linear_damping;
        }

        self.scheduler.schedule(
            Animation::ShrinkRestLength {
                spring: active.id,
                from: active.spring.rest_length,
            },
            self.now_ms,
            self.config.animations.rest_length_shrink_ms,
            Easing::ExponentialInOut,
        );

        if self.choreographer.is_message_complete() {
            info!(
                "Message assembled ({} springs for {} letters)",
                self.choreographer.springed_count(),
                self.choreographer.letters_total()
            );
            self.gateway.publish(ExperienceEvent::MessageDone);
        }
        true
    }

    fn advance_animations(&mut self, now_ms: f64) {
        for frame in self.scheduler.advance(now_ms) {
            match frame.animation {
                Animation::ShrinkRestLength { spring, from } => {
                    let rest_length = from * (1.0 - frame.eased);
                    if !self.choreographer.set_rest_length(spring, rest_length) {
                        debug!("Skipping stale rest-length update of {spring}");
                    }
                }
                Animation::Righting { body, from } => {
                    match self.registry.entry_for_body_mut(body) {
                        Some(entry) if entry.role.is_springing() => {
                            entry.visual.rotation = from.slerp(Quat::IDENTITY, frame.eased);
                        }
                        _ => debug!("Skipping stale righting of {body}"),
                    }
                }
                Animation::StarterFade { body, from_opacity } => {
                    if let Some(entry) = self.registry.entry_for_body_mut(body) {
                        entry.visual.opacity = from_opacity * (1.0 - frame.eased);
                        if frame.finished {
                            entry.visual.visible = false;
                        }
                    }
                    if frame.finished {
                        self.world.sleep(body);
                        debug!("Starter {body} retired");
                    }
                }
            }
        }
    }

    fn sync_viewpoint(&mut self) {
        let viewpoint = self.viewpoint();
        if let Some(body) = self.world.body_mut(self.camera_body) {
            bridge::follow_viewpoint(body, viewpoint);
        }
    }

    fn sync_bodies(&mut self) {
        let mut righting = Vec::new();
        for entry in self.registry.iter_mut() {
            let Some(body) = self.world.body_mut(entry.body) else {
                continue;
            };
            if bridge::sync_entry(entry, body) {
                righting.push((entry.body, entry.visual.rotation.normalize()));
            }
        }

        for (body, from) in righting {
            self.scheduler.schedule(
                Animation::Righting { body, from },
                self.now_ms,
                self.config.animations.righting_ms,
                Easing::Linear,
            );
        }
    }
}
