use spring_message::*;

fn cube(id: u64, position: Vec3) -> VisualDescriptor {
    VisualDescriptor::new(
        VisualId(id),
        position,
        Aabb::from_center_size(Vec3::ZERO, Vec3::splat(0.6)),
    )
}

fn manager() -> PhysicsManager {
    let mut manager = PhysicsManager::new(ExperienceConfig::default()).expect("default config");
    manager.set_message("A").expect("first message");
    manager
}

#[test]
fn letters_get_a_stronger_pull_than_decorations() {
    let mut manager = manager();
    let letter = manager
        .register(
            cube(1, Vec3::new(3.0, 2.0, -6.0)).with_spring_target(0),
            ShapeKind::Box,
            BodyKind::Springable,
            None,
        )
        .expect("letter");
    let shape = manager
        .register(cube(2, Vec3::new(-3.0, 2.0, -6.0)), ShapeKind::Box, BodyKind::Decoration, None)
        .expect("decoration");
    manager.update(0.0);

    manager.handle_action(PlayerAction::Primary);

    let speed = |handle| {
        manager
            .world()
            .body(handle)
            .map(|body| body.velocity.linear.length())
            .unwrap_or_default()
    };
    let letter_speed = speed(letter);
    let shape_speed = speed(shape);
    assert!(letter_speed > shape_speed);
    // (force / 30 + force / 2) / mass and (force / 30 + force / 500) / mass.
    assert!((letter_speed - (10.0 / 30.0 + 5.0) / 5.0).abs() < 1e-4);
    assert!((shape_speed - (10.0 / 30.0 + 0.02) / 5.0).abs() < 1e-4);
}

#[test]
fn impulse_points_at_the_viewpoint() {
    let mut manager = manager();
    let shape = manager
        .register(cube(1, Vec3::new(2.0, 1.0, 0.0)), ShapeKind::Box, BodyKind::Decoration, None)
        .expect("decoration");
    manager.update(0.0);
    manager.attract_all_to_player();

    let velocity = manager.world().body(shape).expect("body").velocity.linear;
    let expected = Vec3::new(-2.0, 5.0, -0.5).normalize();
    assert!(velocity.normalize().abs_diff_eq(expected, 1e-5));
}

#[test]
fn vr_mode_attracts_toward_the_headset() {
    let mut manager = manager();
    let shape = manager
        .register(cube(1, Vec3::new(0.0, 1.0, 0.0)), ShapeKind::Box, BodyKind::Decoration, None)
        .expect("decoration");
    manager.set_viewpoint(ViewMode::Vr, Vec3::new(0.0, 1.0, -4.0));
    manager.set_mode(ViewMode::Vr);
    manager.update(0.0);
    manager.attract_all_to_player();

    let velocity = manager.world().body(shape).expect("body").velocity.linear;
    assert!(velocity.normalize().abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-5));
}

#[test]
fn springing_bodies_and_actuators_are_left_alone() {
    let mut manager = manager();
    let hand = manager
        .register(
            cube(1, Vec3::new(-6.0, 1.1, 0.0)),
            ShapeKind::Box,
            BodyKind::Actuator(ActuatorId(0)),
            None,
        )
        .expect("hand");
    let starter = manager
        .register_starter(cube(2, Vec3::new(0.0, 1.1, 0.0)))
        .expect("starter");
    let letter = manager
        .register(
            cube(3, Vec3::new(3.0, 2.0, -6.0)).with_spring_target(0),
            ShapeKind::Box,
            BodyKind::Springable,
            None,
        )
        .expect("letter");

    manager.update(0.0);
    manager.update(1000.0);
    manager.handle_collision(hand, starter);
    manager.handle_collision(hand, letter);
    if let Some(body) = manager.world_mut().body_mut(letter) {
        body.velocity = Velocity::default();
    }

    manager.attract_all_to_player();
    let letter_body = manager.world().body(letter).expect("body");
    assert_eq!(letter_body.velocity.linear, Vec3::ZERO);
    let hand_body = manager.world().body(hand).expect("body");
    assert_eq!(hand_body.velocity.linear, Vec3::ZERO);
}

#[test]
fn starting_the_session_attracts_once() {
    let mut manager = manager();
    let hand = manager
        .register(
            cube(1, Vec3::new(-6.0, 1.1, 0.0)),
            ShapeKind::Box,
            BodyKind::Actuator(ActuatorId(0)),
            None,
        )
        .expect("hand");
    let starter = manager
        .register_starter(cube(2, Vec3::new(0.0, 1.1, 0.0)))
        .expect("starter");
    let shape = manager
        .register(cube(3, Vec3::new(5.0, 3.0, -5.0)), ShapeKind::Box, BodyKind::Decoration, None)
        .expect("decoration");
    manager.update(0.0);
    manager.update(1000.0);

    let before = manager.world().body(shape).expect("body").velocity.linear;
    assert_eq!(before, Vec3::ZERO);
    manager.handle_collision(hand, starter);
    let after = manager.world().body(shape).expect("body").velocity.linear;
    assert!(after.length() > 0.0);
}
