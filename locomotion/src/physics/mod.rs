// Physics seam
//
// The controller only ever touches the player body through `VelocityBody`.
// Each physics backend gets one implementation: `RapierBody` for a rapier3d
// world and `KinematicBody` for hosts (and tests) without one.

mod kinematic_body;
mod rapier_body;
pub mod util;

pub use kinematic_body::KinematicBody;
pub use rapier_body::RapierBody;

use cgmath::Vector3;

/// How the body is set up when the controller starts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyOptions {
    pub gravity: bool,
    pub continuous_collision: bool,
    pub lock_rotation: bool,
}

impl Default for BodyOptions {
    fn default() -> Self {
        BodyOptions {
            gravity: true,
            continuous_collision: true,
            lock_rotation: true,
        }
    }
}

/// Velocity and position access to the player's rigid body
pub trait VelocityBody {
    fn linear_velocity(&self) -> Vector3<f32>;

    fn set_linear_velocity(&mut self, velocity: Vector3<f32>);

    fn set_angular_velocity(&mut self, velocity: Vector3<f32>);

    fn position(&self) -> Vector3<f32>;

    fn set_position(&mut self, position: Vector3<f32>);

    /// Make the body dynamic and apply `options`
    fn configure(&mut self, options: &BodyOptions);
}

/// Reborrow an optional body for a call that should not consume it
pub fn reborrow<'s, 'b>(
    body: &'s mut Option<&'b mut dyn VelocityBody>,
) -> Option<&'s mut dyn VelocityBody> {
    match body {
        Some(body) => Some(&mut **body),
        None => None,
    }
}
