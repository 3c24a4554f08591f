// Synthetic VR rig
//
// Stands in for the headset runtime: produces a tracked head and two hands
// swinging in antiphase along the head's forward axis, with optional sensor
// jitter, plus scripted button presses.

use std::f32::consts::PI;

use cgmath::{Quaternion, Rotation3, Vector3, Rad, vec3};
use locomotion::{Buttons, Head, InputContext};
use rand::{Rng, SeedableRng, rngs::StdRng};

const HEAD_HEIGHT: f32 = 1.7;
const HAND_HEIGHT: f32 = 1.1;
const HAND_REST_FORWARD: f32 = 0.3;
const HAND_SPREAD: f32 = 0.2;

#[derive(Clone, Debug)]
pub struct RigOptions {
    pub swing_hz: f32,
    pub swing_amplitude_m: f32,
    /// Triggers are squeezed from this time on
    pub engage_after_s: f32,
    /// Triggers are released again at this time, if set
    pub release_after_s: Option<f32>,
    /// Standard deviation-ish amplitude of uniform position jitter
    pub jitter_m: f32,
    pub jump_at_s: Vec<f32>,
    pub respawn_at_s: Vec<f32>,
    /// Head yaw rate, to exercise turning while walking
    pub turn_rate_deg_s: f32,
    pub seed: u64,
}

impl Default for RigOptions {
    fn default() -> Self {
        RigOptions {
            swing_hz: 1.5,
            swing_amplitude_m: 0.25,
            engage_after_s: 0.5,
            release_after_s: None,
            jitter_m: 0.0,
            jump_at_s: Vec::new(),
            respawn_at_s: Vec::new(),
            turn_rate_deg_s: 0.0,
            seed: 7,
        }
    }
}

pub struct SyntheticRig {
    options: RigOptions,
    rng: StdRng,
    prev_time: Option<f32>,
}

impl SyntheticRig {
    pub fn new(options: RigOptions) -> SyntheticRig {
        let rng = StdRng::seed_from_u64(options.seed);
        SyntheticRig {
            options,
            rng,
            prev_time: None,
        }
    }

    /// Input for the frame at `now`. `head_world` is where the player body
    /// currently carries the headset.
    pub fn sample(&mut self, now: f32, head_world: Vector3<f32>) -> InputContext {
        let engaged = now >= self.options.engage_after_s
            && self.options.release_after_s.is_none_or(|release| now < release);
        let trigger = if engaged { 1.0 } else { 0.0 };

        let yaw = Quaternion::from_angle_y(Rad(self.options.turn_rate_deg_s.to_radians() * now));
        let swing = if engaged {
            self.options.swing_amplitude_m * (2.0 * PI * self.options.swing_hz * now).sin()
        } else {
            0.0
        };

        let mut input = InputContext {
            head: Some(Head {
                local_position: vec3(0.0, HEAD_HEIGHT, 0.0),
                local_rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
                world_position: head_world + vec3(0.0, HEAD_HEIGHT, 0.0),
                world_rotation: yaw,
            }),
            pressed: self.pressed_between(now),
            ..InputContext::default()
        };

        input.left_hand.position =
            vec3(-HAND_SPREAD, HAND_HEIGHT, -HAND_REST_FORWARD - swing) + self.jitter();
        input.right_hand.position =
            vec3(HAND_SPREAD, HAND_HEIGHT, -HAND_REST_FORWARD + swing) + self.jitter();
        input.left_hand.trigger_value = trigger;
        input.right_hand.trigger_value = trigger;

        self.prev_time = Some(now);
        input
    }

    /// Scripted presses whose time falls in (previous frame, now]
    fn pressed_between(&self, now: f32) -> Buttons {
        let after = self.prev_time.unwrap_or(f32::NEG_INFINITY);
        let fired = |times: &[f32]| times.iter().any(|t| *t > after && *t <= now);

        let mut pressed = Buttons::empty();
        if fired(&self.options.jump_at_s) {
            pressed |= Buttons::A;
        }
        if fired(&self.options.respawn_at_s) {
            pressed |= Buttons::B;
        }
        pressed
    }

    fn jitter(&mut self) -> Vector3<f32> {
        let j = self.options.jitter_m;
        if j <= 0.0 {
            return vec3(0.0, 0.0, 0.0);
        }
        vec3(
            self.rng.gen_range(-j..j),
            self.rng.gen_range(-j..j),
            self.rng.gen_range(-j..j),
        )
    }
}
