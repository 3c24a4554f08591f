use cgmath::Vector3;

/// Host-side actions requested by the controller. The host applies them
/// after the callback returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fire-and-forget sound on the player's audio source
    PlaySound { name: String },
    /// Hide a scene object, e.g. a collected coin
    DeactivateEntity { name: String },
    /// Move the player transform directly; used when there is no rigid body
    SetPlayerPosition {
        position: Vector3<f32>,
        is_teleport: bool,
    },
}
