use bitflags::bitflags;
use cgmath::{Quaternion, Rotation, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::vr_config::Handedness;

/// Forward in tracking and world space
pub const FORWARD: Vector3<f32> = vec3(0.0, 0.0, -1.0);

bitflags! {
    /// Face buttons that went down this frame
    #[derive(Default)]
    pub struct Buttons: u32 {
        const A = 0b0001;
        const B = 0b0010;
        const X = 0b0100;
        const Y = 0b1000;
    }
}

/// A single face button, as named in configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VrButton {
    A,
    B,
    X,
    Y,
}

impl VrButton {
    pub fn flag(self) -> Buttons {
        match self {
            VrButton::A => Buttons::A,
            VrButton::B => Buttons::B,
            VrButton::X => Buttons::X,
            VrButton::Y => Buttons::Y,
        }
    }
}

/// Head-mounted display pose
#[derive(Clone, Copy, Debug)]
pub struct Head {
    /// Position relative to the tracking space origin
    pub local_position: Vector3<f32>,
    pub local_rotation: Quaternion<f32>,
    pub world_position: Vector3<f32>,
    pub world_rotation: Quaternion<f32>,
}

impl Head {
    pub fn world_forward(&self) -> Vector3<f32> {
        self.world_rotation.rotate_vector(FORWARD)
    }

    pub fn local_forward(&self) -> Vector3<f32> {
        self.local_rotation.rotate_vector(FORWARD)
    }
}

impl Default for Head {
    fn default() -> Self {
        Head {
            local_position: vec3(0.0, 0.0, 0.0),
            local_rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            world_position: vec3(0.0, 0.0, 0.0),
            world_rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Controller state for one hand
#[derive(Clone, Copy, Debug)]
pub struct Hand {
    /// Position relative to the tracking space origin
    pub position: Vector3<f32>,
    /// Index trigger, 0..1
    pub trigger_value: f32,
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            position: vec3(0.0, 0.0, 0.0),
            trigger_value: 0.0,
        }
    }
}

/// Everything the controller reads from the VR runtime for one frame
#[derive(Clone, Debug, Default)]
pub struct InputContext {
    /// `None` when the headset pose is not tracked
    pub head: Option<Head>,
    pub left_hand: Hand,
    pub right_hand: Hand,
    /// Buttons whose press edge happened this frame
    pub pressed: Buttons,
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }

    pub fn was_pressed(&self, button: VrButton) -> bool {
        self.pressed.contains(button.flag())
    }

    pub fn any_pressed(&self, buttons: &[VrButton]) -> bool {
        buttons.iter().any(|button| self.was_pressed(*button))
    }

    /// Trigger values are compared strictly: a value equal to the threshold does not hold.
    pub fn trigger_held(&self, handedness: Handedness, threshold: f32) -> bool {
        self.hand(handedness).trigger_value > threshold
    }
}
