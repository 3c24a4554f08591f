use cgmath::{Vector3, Zero};
use engine::{
    math::{clamp_magnitude, horizontal, move_towards},
    motion_log, physics_log,
};

use crate::{
    config::{JumpConfig, MotionConfig},
    physics::VelocityBody,
};

/// Below this target speed the driver brakes with `decel_mps2`
const MOVING_SPEED_EPSILON: f32 = 0.01;

/// Turns the gait axis into the body's horizontal velocity, and owns jump
/// and respawn.
#[derive(Clone, Debug)]
pub struct MotionDriver {
    desired_horizontal_velocity: Vector3<f32>,
    last_jump_time: f32,
}

impl Default for MotionDriver {
    fn default() -> Self {
        MotionDriver {
            desired_horizontal_velocity: Vector3::zero(),
            last_jump_time: -999.0,
        }
    }
}

impl MotionDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Velocity handed to the next physics step
    pub fn desired_horizontal_velocity(&self) -> Vector3<f32> {
        self.desired_horizontal_velocity
    }

    pub fn last_jump_time(&self) -> f32 {
        self.last_jump_time
    }

    pub fn target_speed(config: &MotionConfig, axis: f32) -> f32 {
        let axis = axis.clamp(-1.0, 1.0);
        axis.signum() * axis.abs() * config.max_speed_mps * config.translation_gain
    }

    /// Move the desired velocity from `current` toward `forward * target_speed`,
    /// accelerating while there is somewhere to go and braking otherwise.
    /// `forward` must be horizontal and unit length.
    pub fn steer(
        &mut self,
        config: &MotionConfig,
        axis: f32,
        forward: Vector3<f32>,
        current_velocity: Vector3<f32>,
        dt: f32,
    ) -> Vector3<f32> {
        let target_speed = Self::target_speed(config, axis);
        let target = forward * target_speed;
        let rate = if target_speed.abs() > MOVING_SPEED_EPSILON {
            config.accel_mps2
        } else {
            config.decel_mps2
        };

        self.desired_horizontal_velocity =
            move_towards(horizontal(current_velocity), target, rate * dt);

        motion_log!(
            TRACE,
            "target_speed={:.2} desired=({:.2}, {:.2})",
            target_speed,
            self.desired_horizontal_velocity.x,
            self.desired_horizontal_velocity.z
        );

        self.desired_horizontal_velocity
    }

    /// Desired velocity after the per-step ceiling
    pub fn clamped_horizontal_velocity(&self, config: &MotionConfig) -> Vector3<f32> {
        clamp_magnitude(
            horizontal(self.desired_horizontal_velocity),
            config.fixed_step_clamp_mps,
        )
    }

    /// Physics step: write the clamped horizontal velocity, keep the body's
    /// vertical velocity so gravity and jumps integrate untouched.
    pub fn apply(&self, config: &MotionConfig, body: &mut dyn VelocityBody) {
        let horizontal = self.clamped_horizontal_velocity(config);
        let mut velocity = body.linear_velocity();
        velocity.x = horizontal.x;
        velocity.z = horizontal.z;
        body.set_linear_velocity(velocity);

        physics_log!(TRACE, "applied velocity {:?}", velocity);
    }

    /// Jump if the cooldown has elapsed since the last accepted press. The
    /// press is consumed (and the cooldown restarted) even without a body.
    pub fn try_jump(
        &mut self,
        config: &JumpConfig,
        now: f32,
        body: Option<&mut dyn VelocityBody>,
    ) -> bool {
        if !config.enabled || now - self.last_jump_time < config.cooldown_s {
            motion_log!(DEBUG, "jump ignored at t={:.3}", now);
            return false;
        }

        if let Some(body) = body {
            let mut velocity = body.linear_velocity();
            velocity.y = config.speed_mps;
            body.set_linear_velocity(velocity);
        }
        self.last_jump_time = now;

        motion_log!(DEBUG, "jump at t={:.3}", now);
        true
    }

    /// Stop the body dead and move it to `position`
    pub fn respawn(&mut self, body: &mut dyn VelocityBody, position: Vector3<f32>) {
        body.set_linear_velocity(Vector3::zero());
        body.set_angular_velocity(Vector3::zero());
        body.set_position(position);
        self.desired_horizontal_velocity = Vector3::zero();

        motion_log!(INFO, "respawned at {:?}", position);
    }
}
