// Arm-swing VR locomotion
//
// Turns hand swing and trigger state into a horizontal velocity for the
// player body, handles jump/respawn buttons and reacts to trigger volumes.
// The host owns the frame loop: it calls `update` once per rendered frame
// and `fixed_update` once per physics step.

pub mod config;
pub mod controller;
pub mod effect;
pub mod events;
pub mod gait;
pub mod input_context;
pub mod motion;
pub mod physics;
pub mod time;
pub mod vr_config;

pub use config::{ConfigError, GaitConfig, InputConfig, JumpConfig, LocomotionConfig, MotionConfig};
pub use controller::{GaitTelemetry, LocomotionController};
pub use effect::Effect;
pub use events::{
    Collaborators, EventReactor, ParkourCounter, SelectionTaskMeasure, Transform, TriggerTag,
    TriggerVolume,
};
pub use gait::{GaitEstimator, GaitFrame, GaitState, HandOffsets};
pub use input_context::{Buttons, Hand, Head, InputContext, VrButton};
pub use motion::MotionDriver;
pub use physics::{BodyOptions, KinematicBody, RapierBody, VelocityBody};
pub use time::Time;
