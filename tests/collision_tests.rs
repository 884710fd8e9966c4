use spring_message::*;

const HAND: ActuatorId = ActuatorId(3);

fn cube(id: u64, position: Vec3, size: f32) -> VisualDescriptor {
    VisualDescriptor::new(
        VisualId(id),
        position,
        Aabb::from_center_size(Vec3::ZERO, Vec3::splat(size)),
    )
}

fn manager_with_starter() -> (PhysicsManager, BodyHandle, BodyHandle) {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    manager.set_message("OK").expect("first message");
    let hand = manager
        .register(
            cube(1, Vec3::new(-8.0, 1.1, 0.0), 0.4),
            ShapeKind::Box,
            BodyKind::Actuator(HAND),
            None,
        )
        .expect("hand");
    let starter = manager
        .register_starter(cube(2, Vec3::new(0.0, 1.1, 0.0), 0.8))
        .expect("starter");
    (manager, hand, starter)
}

#[test]
fn touching_the_starter_through_the_world_starts_the_session() {
    let (mut manager, _hand, starter) = manager_with_starter();
    manager.update(0.0);
    manager.update(1000.0);
    assert!(!manager.has_started());

    manager
        .set_visual_pose(VisualId(1), Vec3::new(0.0, 1.1, 0.3), Quat::IDENTITY)
        .expect("known visual");
    // The actuator is moved into place at the end of this frame...
    manager.update(1020.0);
    // ...and the contact is detected during the next step.
    let report = manager.update(1040.0);

    assert!(report
        .events
        .contains(&ExperienceEvent::Starts { actuator: HAND }));
    assert!(manager.has_started());
    assert!(manager.starter_spring().is_none());
    assert!(manager.role_of(starter).is_some_and(|role| role.is_starter()));
}

#[test]
fn starter_contact_before_the_guard_does_not_start() {
    let (mut manager, _hand, _starter) = manager_with_starter();
    manager
        .set_visual_pose(VisualId(1), Vec3::new(0.0, 1.1, 0.3), Quat::IDENTITY)
        .expect("known visual");
    manager.update(0.0);
    let report = manager.update(300.0);

    assert!(report.events.is_empty());
    assert!(!manager.has_started());
    assert!(manager.starter_spring().is_some());
}

#[test]
fn sphere_actuators_do_not_trigger_rules() {
    let (mut manager, _hand, starter) = manager_with_starter();
    let pointer = manager
        .register(
            cube(5, Vec3::new(8.0, 1.1, 0.0), 0.4),
            ShapeKind::Sphere,
            BodyKind::Actuator(ActuatorId(9)),
            None,
        )
        .expect("pointer");
    manager.update(0.0);
    manager.update(1500.0);

    assert!(manager.handle_collision(pointer, starter).is_empty());
    assert!(!manager.has_started());
}

#[test]
fn collisions_with_unknown_bodies_are_ignored() {
    let (mut manager, hand, _starter) = manager_with_starter();
    manager.update(0.0);
    manager.update(1500.0);

    assert!(manager.handle_collision(hand, BodyHandle(999)).is_empty());
    assert!(manager.handle_collision(BodyHandle(998), BodyHandle(999)).is_empty());
    // Static scenery is registered in the world but not in the registry.
    assert!(manager.handle_collision(hand, manager.ground()).is_empty());
}

#[test]
fn decorations_are_never_struck() {
    let (mut manager, hand, starter) = manager_with_starter();
    let shape = manager
        .register(
            cube(6, Vec3::new(4.0, 2.0, -4.0), 0.5),
            ShapeKind::Box,
            BodyKind::Decoration,
            None,
        )
        .expect("decoration");
    manager.update(0.0);
    manager.update(1000.0);
    manager.handle_collision(hand, starter);

    assert!(manager.handle_collision(hand, shape).is_empty());
    assert_eq!(manager.springed_count(), 0);
}

#[test]
fn closed_area_keeps_bodies_inside() {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    let walls = manager.set_closed_area(6.0, 6.0, 6.0);
    assert_eq!(walls.len(), 5);

    let ball = manager
        .register(
            cube(1, Vec3::new(2.9, 3.0, 0.0), 0.5),
            ShapeKind::Sphere,
            BodyKind::Decoration,
            None,
        )
        .expect("ball");
    if let Some(body) = manager.world_mut().body_mut(ball) {
        body.velocity.linear = Vec3::new(3.0, 0.0, 0.0);
    }

    let mut timestamp = 0.0;
    for _ in 0..60 {
        manager.update(timestamp);
        timestamp += 1000.0 / 60.0;
    }

    let x = manager.world().body(ball).expect("body").position().x;
    assert!(x < 3.0, "ball escaped through the wall: x = {x}");
}

fn corners(half: f32) -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity(8);
    for x in [-half, half] {
        for y in [-half, half] {
            for z in [-half, half] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    vertices
}

#[test]
fn huge_meshes_do_not_stall_the_step() {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    let hull = manager
        .register(
            cube(8, Vec3::ZERO, 4000.0).with_vertices(corners(2000.0)),
            ShapeKind::ConvexMesh,
            BodyKind::Decoration,
            None,
        )
        .expect("large but valid mesh");
    manager
        .register(
            cube(9, Vec3::new(3.0, 1.0, 0.0), 0.5),
            ShapeKind::Sphere,
            BodyKind::Decoration,
            None,
        )
        .expect("ball");

    manager.update(0.0);
    let report = manager.update(16.7);
    assert_eq!(report.substeps, 1);
    assert!(manager.world().body(hull).is_some());
}

#[test]
fn meshes_with_non_finite_vertices_are_rejected() {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    let err = manager
        .register(
            cube(10, Vec3::ZERO, 1.0).with_vertices(vec![Vec3::ONE, Vec3::splat(f32::NAN)]),
            ShapeKind::ConvexMesh,
            BodyKind::Decoration,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, ExperienceError::DegenerateBounds(VisualId(10))));
    assert!(manager.visuals().next().is_none());
}
