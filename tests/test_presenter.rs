use pipette_arm::link::MaterialRole;
use pipette_arm::palette::Treatment;
use pipette_arm::*;

const SIZE: SurfaceSize = SurfaceSize {
    width: 800,
    height: 600,
};

fn mount(engine: &mut HeadlessEngine, state: &AppState) -> Presenter {
    Presenter::mount(engine, SIZE, &Environment::default(), &state.snapshot())
}

fn frame_transforms(engine: &HeadlessEngine, presenter: &Presenter) -> Vec<Isometry3<f32>> {
    JointId::ALL
        .iter()
        .map(|joint| {
            engine
                .world_transform(presenter.frame(*joint).unwrap())
                .unwrap()
        })
        .collect()
}

fn material_colors(engine: &HeadlessEngine, presenter: &Presenter) -> Vec<u32> {
    MaterialRole::ALL
        .iter()
        .map(|role| {
            engine
                .material(presenter.material(*role).unwrap())
                .unwrap()
                .color
                .to_hex()
        })
        .collect()
}

#[test]
fn test_mount_unmount_releases_everything_once() {
    let mut engine = HeadlessEngine::new();
    let presenter = mount(&mut engine, &AppState::new());
    presenter.unmount(&mut engine).unwrap();

    assert!(engine.live_resources().is_empty());
    let stats = engine.stats();
    assert_eq!(stats.surfaces_created, stats.surfaces_released);
    assert_eq!(stats.geometries_created, stats.geometries_released);
    assert_eq!(stats.materials_created, stats.materials_released);
    assert_eq!(stats.nodes_added, stats.nodes_removed);
}

#[test]
fn test_remount_is_identical() {
    let mut engine = HeadlessEngine::new();
    let state = AppState::new();

    let first = mount(&mut engine, &state);
    let live = engine.live_resources();
    let frame = engine.last_frame().unwrap().clone();
    first.unmount(&mut engine).unwrap();

    let second = mount(&mut engine, &state);
    assert_eq!(engine.live_resources(), live);
    let again = engine.last_frame().unwrap();
    assert_eq!(again.meshes, frame.meshes);
    assert_ne!(again.surface, frame.surface);
    second.unmount(&mut engine).unwrap();
    assert!(engine.live_resources().is_empty());
}

#[test]
fn test_joint_change_touches_only_its_frame() {
    let mut engine = HeadlessEngine::new();
    let mut state = AppState::new();
    let mut presenter = mount(&mut engine, &state);
    let before = engine.stats();
    let colors = material_colors(&engine, &presenter);
    let locals = JointId::ALL
        .map(|joint| engine.local_transform(presenter.frame(joint).unwrap()).unwrap());

    state.update(Message::JointChanged {
        joint: JointId::Wrist,
        degrees: -40,
    });
    assert!(presenter.apply(&mut engine, &state.snapshot()).unwrap());

    let after = engine.stats();
    assert_eq!(after.transforms_set - before.transforms_set, 1);
    assert_eq!(after.materials_updated, before.materials_updated);
    assert_eq!(after.geometries_created, before.geometries_created);
    assert_eq!(after.nodes_added, before.nodes_added);
    assert_eq!(after.renders - before.renders, 1);
    assert_eq!(material_colors(&engine, &presenter), colors);
    for joint in JointId::ALL {
        let local = engine.local_transform(presenter.frame(joint).unwrap()).unwrap();
        assert_eq!(local == locals[joint.index()], joint != JointId::Wrist);
    }
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_color_change_keeps_transforms() {
    let mut engine = HeadlessEngine::new();
    let mut state = AppState::new();
    let mut presenter = mount(&mut engine, &state);
    let transforms = frame_transforms(&engine, &presenter);
    let before = engine.stats();

    state.update(Message::ColorChanged(PaletteColor::Green.into()));
    assert!(presenter.apply(&mut engine, &state.snapshot()).unwrap());

    assert_eq!(frame_transforms(&engine, &presenter), transforms);
    let after = engine.stats();
    assert_eq!(after.transforms_set, before.transforms_set);
    assert_eq!(after.geometries_created, before.geometries_created);
    // the four body shades only
    assert_eq!(after.materials_updated - before.materials_updated, 4);
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_red_then_white() {
    let mut engine = HeadlessEngine::new();
    let mut state = AppState::new();
    let mut presenter = mount(&mut engine, &state);

    state.update(Message::ColorChanged("red".into()));
    presenter.apply(&mut engine, &state.snapshot()).unwrap();
    state.update(Message::ColorChanged("white".into()));
    presenter.apply(&mut engine, &state.snapshot()).unwrap();

    let white = Treatment::for_selection(&PaletteColor::White.into());
    for role in MaterialRole::ALL {
        let material = engine.material(presenter.material(role).unwrap()).unwrap();
        assert_eq!(*material, white.material(role), "{:?}", role);
    }
    let frame = engine.last_frame().unwrap();
    assert_eq!(
        frame.mesh("segment3").unwrap().material,
        white.material(MaterialRole::Body { shade: 3 })
    );
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_unknown_color_uses_default_treatment() {
    let mut engine = HeadlessEngine::new();
    let state = AppState::with_color(ColorSelection::from("ultraviolet"));
    let presenter = mount(&mut engine, &state);
    assert!(!presenter.is_placeholder());
    assert_eq!(
        material_colors(&engine, &presenter),
        vec![0x666666, 0x777777, 0x888888, 0x999999, 0xffffff, 0x444444]
    );
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_unavailable_engine_shows_placeholder() {
    let mut engine = HeadlessEngine::unavailable("no graphics context");
    let mut state = AppState::new();
    let mut presenter = mount(&mut engine, &state);
    match presenter.view() {
        Viewport::Placeholder(message) => assert!(message.contains("no graphics context")),
        other => panic!("unexpected {:?}", other),
    }
    state.update(Message::ResetRequested);
    assert!(!presenter.apply(&mut engine, &state.snapshot()).unwrap());
    presenter.unmount(&mut engine).unwrap();
    assert!(engine.live_resources().is_empty());
    assert_eq!(engine.stats().renders, 0);
}

#[test]
fn test_reset_updates_every_frame_in_one_render() {
    let mut engine = HeadlessEngine::new();
    let mut state = AppState::new();
    for (joint, degrees) in JointId::ALL.into_iter().zip([5, 6, 7, 8, 9]) {
        state.update(Message::JointChanged { joint, degrees });
    }
    let mut presenter = mount(&mut engine, &state);
    let before = engine.stats();

    state.update(Message::ResetRequested);
    presenter.apply(&mut engine, &state.snapshot()).unwrap();

    let after = engine.stats();
    assert_eq!(after.transforms_set - before.transforms_set, NUM_JOINTS);
    assert_eq!(after.renders - before.renders, 1);
    let expected = world_transforms(&JointAngles::home(), &ARM_GEOMETRY);
    for (pose, expected) in frame_transforms(&engine, &presenter).iter().zip(expected.iter()) {
        assert!((pose.translation.vector - expected.translation.vector).norm() < 1e-5);
    }
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_rendered_frame_contents() {
    let mut engine = HeadlessEngine::new();
    let presenter = mount(&mut engine, &AppState::new());
    let frame = engine.last_frame().unwrap();
    assert_eq!(frame.meshes.len(), 9);
    assert_eq!(frame.background, Some(0xf0f0f0));
    let base = frame.mesh("base").unwrap();
    assert!((base.world.translation.vector.y - ARM_GEOMETRY.base.length / 2.0).abs() < 1e-6);
    // the arm is in front of the camera
    for mesh in &frame.meshes {
        assert!(mesh.ndc.x.abs() <= 1.0 && mesh.ndc.y.abs() <= 1.0, "{}", mesh.name);
    }
    presenter.unmount(&mut engine).unwrap();
}

#[test]
fn test_zero_width_surface_shows_placeholder() {
    let mut engine = HeadlessEngine::new();
    let state = AppState::new();
    let size = SurfaceSize {
        width: 0,
        height: 600,
    };
    let presenter = Presenter::mount(&mut engine, size, &Environment::default(), &state.snapshot());
    match presenter.view() {
        Viewport::Placeholder(message) => assert!(message.contains("empty surface")),
        other => panic!("unexpected {:?}", other),
    }
    presenter.unmount(&mut engine).unwrap();
    assert!(engine.live_resources().is_empty());
    assert_eq!(engine.stats().renders, 0);
}
