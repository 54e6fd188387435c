//! Environment end-to-end scenarios

use oculomotor::content::TextureRegistry;
use oculomotor::core::types::task_rng;
use oculomotor::environment::{Environment, HeadlessRenderer, RenderMode};
use oculomotor::tasks::PointToTarget;
use oculomotor::{EnvConfig, OculoError, TaskKind, TrialResult};

fn point_to_target_env(seed: u64) -> Environment {
    let config = EnvConfig::with_seed(seed);
    let mut rng = task_rng(config.seed);
    let mut registry = TextureRegistry::new();
    let task = PointToTarget::new(Some(0), true, &mut registry, &mut rng).unwrap();
    Environment::new(Box::new(task), rng, config, HeadlessRenderer::new()).unwrap()
}

#[test]
fn test_point_to_target_trial_through_camera() {
    let mut env = point_to_target_env(11);
    let obs = env.reset();
    assert_eq!(obs.screen.sprites.len(), 1);
    assert_eq!(obs.screen.resolution, 128);

    // The initial pitch puts the gaze above the start marker.
    let result = env.step(&[0.0, 0.0]).unwrap();
    assert!(!result.rendered);
    assert_eq!(result.reward, 0);
    assert_eq!(result.observation.screen.sprites.len(), 1);

    let (_, v) = env.camera().angles();
    let result = env.step(&[0.0, -v]).unwrap();
    assert!(result.rendered);
    assert_eq!(result.observation.screen.sprites.len(), 2);

    // Saccade onto the target, found through the rendered frame: the lure
    // is drawn first, the target last.
    let target = *result.observation.screen.sprites.last().unwrap();
    let depth = 3.0_f32;
    let (h, v) = env.camera().angles();
    let target_h = -(target.position.x / depth).atan();
    let target_v = (target.position.y * target_h.cos() / depth).atan();
    let result = env.step(&[target_h - h, target_v - v]).unwrap();

    let focus = env.focus();
    assert!(
        (focus - target.position).length() < target.half_width,
        "focus {focus:?} missed target {:?}",
        target.position
    );
    assert_eq!(result.reward, 2);
    let info = result.info.unwrap();
    assert_eq!(info.result, TrialResult::Success);
    assert_eq!(info.reaction_step, 1);
    assert_eq!(result.observation.screen.sprites.len(), 1);
}

#[test]
fn test_malformed_actions_rejected() {
    let mut env =
        Environment::for_task(TaskKind::MultipleObjectTracking, None, EnvConfig::with_seed(2))
            .unwrap();
    for action in [&[][..], &[0.1][..], &[0.1, 0.2, 0.3][..], &[f32::NAN, 0.0][..]] {
        assert!(matches!(env.step(action), Err(OculoError::InvalidAction(_))));
    }
    assert_eq!(env.runner().step_count(), 0);
}

#[test]
fn test_camera_clamped_at_limits() {
    let mut env = Environment::for_task(TaskKind::OddOneOut, None, EnvConfig::with_seed(3)).unwrap();
    let result = env.step(&[10.0, -10.0]).unwrap();
    let max = 45.0_f32.to_radians();
    let (h, v) = result.observation.angle;
    assert!((h - max).abs() < 1e-6);
    assert!((v + max).abs() < 1e-6);
    assert!(env.focus().is_finite());
}

#[test]
fn test_config_from_toml_drives_environment() {
    let config = EnvConfig::from_toml_str(
        r#"
        off_buffer_width = 64
        max_step_count = 3
        seed = 5

        [camera]
        fov_y_degrees = 60.0
        "#,
    )
    .unwrap();
    let mut env = Environment::for_task(TaskKind::RandomDotMotion, Some(4), config).unwrap();
    let obs = env.reset();
    assert_eq!(obs.screen.resolution, 64);
    assert_eq!(obs.screen.fov_y_degrees, 60.0);

    let frame = env.render(RenderMode::RgbArray).unwrap();
    assert_eq!(frame.resolution, 640);

    let dones: Vec<bool> = (0..3).map(|_| env.step(&[0.0, 0.0]).unwrap().done).collect();
    assert_eq!(dones, vec![false, false, true]);
}

#[test]
fn test_observation_serializes() {
    let mut env =
        Environment::for_task(TaskKind::ChangeDetection, Some(1), EnvConfig::with_seed(4)).unwrap();
    let obs = env.reset();
    let json = serde_json::to_value(&obs).unwrap();
    assert!(json["angle"].is_array());
    assert_eq!(json["screen"]["resolution"], 128);
}
