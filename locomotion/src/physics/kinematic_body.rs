use cgmath::{Vector3, Zero};

use super::{BodyOptions, VelocityBody};

/// Body state kept in memory with no integration of its own. The host (or a
/// test) reads back whatever the controller wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicBody {
    pub position: Vector3<f32>,
    pub linear_velocity: Vector3<f32>,
    pub angular_velocity: Vector3<f32>,
    pub options: Option<BodyOptions>,
}

impl KinematicBody {
    pub fn at(position: Vector3<f32>) -> KinematicBody {
        KinematicBody {
            position,
            ..KinematicBody::default()
        }
    }

    /// Integrate position over `dt`, plus gravity when configured with it
    pub fn step(&mut self, dt: f32, gravity: f32) {
        if self.options.is_some_and(|options| options.gravity) {
            self.linear_velocity.y -= gravity * dt;
        }
        self.position += self.linear_velocity * dt;
    }
}

impl Default for KinematicBody {
    fn default() -> Self {
        KinematicBody {
            position: Vector3::zero(),
            linear_velocity: Vector3::zero(),
            angular_velocity: Vector3::zero(),
            options: None,
        }
    }
}

impl VelocityBody for KinematicBody {
    fn linear_velocity(&self) -> Vector3<f32> {
        self.linear_velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vector3<f32>) {
        self.linear_velocity = velocity;
    }

    fn set_angular_velocity(&mut self, velocity: Vector3<f32>) {
        self.angular_velocity = velocity;
    }

    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    fn configure(&mut self, options: &BodyOptions) {
        self.options = Some(*options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_step_applies_gravity_only_when_configured() {
        let mut body = KinematicBody::default();
        body.linear_velocity = vec3(1.0, 0.0, 0.0);
        body.step(0.5, 9.8);
        assert_eq!(body.position, vec3(0.5, 0.0, 0.0));

        body.configure(&BodyOptions::default());
        body.step(0.5, 10.0);
        assert_eq!(body.linear_velocity.y, -5.0);
        assert_eq!(body.position, vec3(1.0, -2.5, 0.0));
    }
}
