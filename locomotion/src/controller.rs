use cgmath::{Quaternion, Rotation, Vector3, Zero};
use engine::{
    input_log,
    math::{MIN_DENOMINATOR, flatten_horizontal, horizontal},
    motion_log,
};
use serde::Serialize;

use crate::{
    config::LocomotionConfig,
    effect::Effect,
    events::{Collaborators, EventReactor, ParkourCounter, TriggerVolume},
    gait::{GaitEstimator, HandOffsets},
    input_context::{FORWARD, InputContext},
    motion::MotionDriver,
    physics::{BodyOptions, VelocityBody, reborrow},
    time::Time,
    vr_config::Handedness,
};

/// Per-frame values for debug overlays and logs
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct GaitTelemetry {
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub engaged: bool,
    pub left_signal_m: f32,
    pub right_signal_m: f32,
    pub swing_power: f32,
    pub gait_axis: f32,
}

/// Arm-swing locomotion for one player body.
///
/// The host calls `start` once, `update` every rendered frame, `fixed_update`
/// every physics step and `on_trigger_enter` when the body enters a trigger
/// volume. The two frame callbacks take `&mut self` and never overlap.
pub struct LocomotionController {
    config: LocomotionConfig,
    gait: GaitEstimator,
    motion: MotionDriver,
    events: EventReactor,
    telemetry: GaitTelemetry,
    /// Facing of the controller itself, used when the headset is not tracked
    facing: Quaternion<f32>,
    prev_update_time: f32,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig) -> Self {
        LocomotionController {
            config,
            gait: GaitEstimator::new(),
            motion: MotionDriver::new(),
            events: EventReactor::new(),
            telemetry: GaitTelemetry::default(),
            facing: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            prev_update_time: 0.0,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(LocomotionConfig::default())
    }

    /// Prime frame timing, reset the gait and set up the body
    pub fn start(&mut self, time: &Time, body: Option<&mut dyn VelocityBody>) {
        self.prev_update_time = time.now_seconds();
        self.gait.reset();

        if !self.config.motion.auto_configure_rigidbody {
            return;
        }
        if let Some(body) = body {
            body.configure(&BodyOptions {
                gravity: self.config.motion.enable_gravity,
                ..BodyOptions::default()
            });
        }
    }

    /// Per-frame callback: sample input, estimate the gait, handle jump and
    /// respawn presses and compute the velocity for the next physics step.
    pub fn update(
        &mut self,
        time: &Time,
        input: &InputContext,
        mut body: Option<&mut dyn VelocityBody>,
        parkour: Option<&ParkourCounter>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        let now = time.now_seconds();
        let dt = (now - self.prev_update_time).max(MIN_DENOMINATOR);

        let threshold = self.config.input.trigger_hold_threshold;
        let engaged = input.trigger_held(Handedness::Left, threshold)
            || input.trigger_held(Handedness::Right, threshold);

        let forward = self.forward_world(input);

        let offsets = if self.config.gait.enable_arm_swing && engaged {
            input.head.as_ref().map(|head| {
                HandOffsets::from_poses(
                    head,
                    input.left_hand.position,
                    input.right_hand.position,
                    self.config.gait.abdomen_offset_m,
                )
            })
        } else {
            None
        };
        let frame = self.gait.advance(&self.config.gait, dt, offsets);

        self.telemetry = GaitTelemetry {
            left_trigger: input.left_hand.trigger_value,
            right_trigger: input.right_hand.trigger_value,
            engaged,
            left_signal_m: frame.left_signal_m,
            right_signal_m: frame.right_signal_m,
            swing_power: frame.swing_power,
            gait_axis: frame.gait_axis,
        };

        let axis = if engaged { frame.gait_axis } else { 0.0 };

        if input.was_pressed(self.config.input.jump_button) {
            input_log!(DEBUG, "jump pressed at t={:.3}", now);
            self.motion
                .try_jump(&self.config.jump, now, reborrow(&mut body));
        }

        let current = body
            .as_deref()
            .map(|body| horizontal(body.linear_velocity()))
            .unwrap_or_else(Vector3::zero);
        self.motion
            .steer(&self.config.motion, axis, forward, current, dt);

        if input.any_pressed(&self.config.input.respawn_buttons) {
            input_log!(DEBUG, "respawn pressed at t={:.3}", now);
            if let Some(effect) = self.respawn(reborrow(&mut body), parkour) {
                effects.push(effect);
            }
        }

        self.prev_update_time = now;
        effects
    }

    /// Physics-step callback: push the clamped horizontal velocity into the body
    pub fn fixed_update(&mut self, body: Option<&mut dyn VelocityBody>) {
        if !self.config.motion.use_rigidbody_movement {
            return;
        }
        if let Some(body) = body {
            self.motion.apply(&self.config.motion, body);
        }
    }

    /// Trigger-volume callback
    pub fn on_trigger_enter(
        &mut self,
        volume: &TriggerVolume,
        input: &InputContext,
        collaborators: &mut Collaborators<'_>,
    ) -> Vec<Effect> {
        let viewer = input.head.as_ref().map(|head| head.world_position);
        self.events.on_trigger_enter(volume, viewer, collaborators)
    }

    fn respawn(
        &mut self,
        body: Option<&mut dyn VelocityBody>,
        parkour: Option<&ParkourCounter>,
    ) -> Option<Effect> {
        let parkour = parkour.filter(|parkour| parkour.run_active)?;
        let position = parkour.respawn_position;

        match body {
            Some(body) => {
                self.motion.respawn(body, position);
                None
            }
            None => {
                motion_log!(INFO, "respawn without body, moving player to {:?}", position);
                Some(Effect::SetPlayerPosition {
                    position,
                    is_teleport: true,
                })
            }
        }
    }

    /// Horizontal heading: the headset's, else the controller's own facing
    fn forward_world(&self, input: &InputContext) -> Vector3<f32> {
        let forward = match &input.head {
            Some(head) => head.world_forward(),
            None => self.facing.rotate_vector(FORWARD),
        };
        flatten_horizontal(forward).unwrap_or(FORWARD)
    }

    pub fn telemetry(&self) -> &GaitTelemetry {
        &self.telemetry
    }

    pub fn current_stage(&self) -> Option<&str> {
        self.events.current_stage()
    }

    pub fn desired_horizontal_velocity(&self) -> Vector3<f32> {
        self.motion.desired_horizontal_velocity()
    }

    pub fn gait(&self) -> &GaitEstimator {
        &self.gait
    }

    pub fn set_facing(&mut self, facing: Quaternion<f32>) {
        self.facing = facing;
    }

    pub fn get_config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LocomotionConfig) {
        self.config = config;
    }
}
