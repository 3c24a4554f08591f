use cgmath::{Vector3, Zero};
use rapier3d::prelude::*;

use super::{
    BodyOptions, VelocityBody,
    util::{nvec_to_cgmath, vec_to_nvec},
};

/// A rigid body living in a rapier3d `RigidBodySet`. A handle that no longer
/// resolves reads as a resting body and ignores writes.
pub struct RapierBody<'a> {
    bodies: &'a mut RigidBodySet,
    handle: RigidBodyHandle,
}

impl<'a> RapierBody<'a> {
    pub fn new(bodies: &'a mut RigidBodySet, handle: RigidBodyHandle) -> RapierBody<'a> {
        RapierBody { bodies, handle }
    }

    pub fn handle(&self) -> RigidBodyHandle {
        self.handle
    }

    fn body(&self) -> Option<&RigidBody> {
        self.bodies.get(self.handle)
    }

    fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.bodies.get_mut(self.handle)
    }
}

impl VelocityBody for RapierBody<'_> {
    fn linear_velocity(&self) -> Vector3<f32> {
        self.body()
            .map(|body| nvec_to_cgmath(body.linvel()))
            .unwrap_or_else(Vector3::zero)
    }

    fn set_linear_velocity(&mut self, velocity: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            body.set_linvel(vec_to_nvec(velocity), true);
        }
    }

    fn set_angular_velocity(&mut self, velocity: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            body.set_angvel(vec_to_nvec(velocity), true);
        }
    }

    fn position(&self) -> Vector3<f32> {
        self.body()
            .map(|body| nvec_to_cgmath(body.translation()))
            .unwrap_or_else(Vector3::zero)
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        if let Some(body) = self.body_mut() {
            body.set_translation(vec_to_nvec(position), true);
        }
    }

    fn configure(&mut self, options: &BodyOptions) {
        if let Some(body) = self.body_mut() {
            body.set_body_type(RigidBodyType::Dynamic, true);
            body.set_gravity_scale(if options.gravity { 1.0 } else { 0.0 }, true);
            body.enable_ccd(options.continuous_collision);
            body.lock_rotations(options.lock_rotation, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_velocity_round_trip() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBodyBuilder::dynamic().build());

        let mut body = RapierBody::new(&mut bodies, handle);
        body.set_linear_velocity(vec3(1.0, 2.0, 3.0));
        body.set_position(vec3(4.0, 5.0, 6.0));

        assert_eq!(body.linear_velocity(), vec3(1.0, 2.0, 3.0));
        assert_eq!(body.position(), vec3(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_configure_makes_body_dynamic() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBodyBuilder::kinematic_velocity_based().build());

        RapierBody::new(&mut bodies, handle).configure(&BodyOptions {
            gravity: false,
            continuous_collision: true,
            lock_rotation: true,
        });

        let body = &bodies[handle];
        assert!(body.is_dynamic());
        assert_eq!(body.gravity_scale(), 0.0);
        assert!(body.is_ccd_enabled());
        assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut bodies = RigidBodySet::new();
        let handle = bodies.insert(RigidBodyBuilder::dynamic().build());
        let mut islands = IslandManager::new();
        let mut colliders = ColliderSet::new();
        let mut impulse_joints = ImpulseJointSet::new();
        let mut multibody_joints = MultibodyJointSet::new();
        bodies.remove(
            handle,
            &mut islands,
            &mut colliders,
            &mut impulse_joints,
            &mut multibody_joints,
            true,
        );

        let mut body = RapierBody::new(&mut bodies, handle);
        body.set_linear_velocity(vec3(1.0, 0.0, 0.0));
        assert_eq!(body.linear_velocity(), Vector3::zero());
    }
}
