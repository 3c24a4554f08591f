// Arm-swing gait estimation
//
// Each hand's forward displacement from the abdomen is split into a slow
// baseline (resting posture) and a swing signal. The rectified velocity of
// both signals is low-passed into a swing power, which maps linearly onto a
// gait axis in [0, 1]. The axis is declared signed so callers can clamp to
// [-1, 1], but power is unsigned and never yields a negative target.

use cgmath::{InnerSpace, Vector3, vec3};
use engine::{
    gait_log,
    math::{MIN_DENOMINATOR, ema_alpha, flatten_horizontal, inverse_lerp, lerp},
};

use crate::{
    config::GaitConfig,
    input_context::{FORWARD, Head},
};

/// Forward displacement of each hand relative to the abdomen, in meters
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandOffsets {
    pub left: f32,
    pub right: f32,
}

impl HandOffsets {
    /// Project both hands (tracking space) onto the head's horizontal forward.
    /// The abdomen sits `abdomen_offset_m` straight below the headset.
    pub fn from_poses(
        head: &Head,
        left_hand: Vector3<f32>,
        right_hand: Vector3<f32>,
        abdomen_offset_m: f32,
    ) -> HandOffsets {
        let abdomen = head.local_position + vec3(0.0, -1.0, 0.0) * abdomen_offset_m;
        let forward = flatten_horizontal(head.local_forward()).unwrap_or(FORWARD);

        HandOffsets {
            left: (left_hand - abdomen).dot(forward),
            right: (right_hand - abdomen).dot(forward),
        }
    }

    fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }
}

/// Filter state carried from frame to frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GaitState {
    pub baseline_left: f32,
    pub baseline_right: f32,
    pub prev_signal_left: f32,
    pub prev_signal_right: f32,
    pub power_low_pass: f32,
    pub gait_axis: f32,
}

impl GaitState {
    fn decay(&mut self, dt: f32, decay_tau: f32) {
        let a = ema_alpha(dt, decay_tau);
        self.gait_axis = lerp(self.gait_axis, 0.0, a);
        self.power_low_pass = lerp(self.power_low_pass, 0.0, a);
    }
}

/// Display values produced by one estimator step
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GaitFrame {
    pub left_signal_m: f32,
    pub right_signal_m: f32,
    pub swing_power: f32,
    pub gait_axis: f32,
}

#[derive(Clone, Debug, Default)]
pub struct GaitEstimator {
    state: GaitState,
}

impl GaitEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GaitState {
        &self.state
    }

    pub fn gait_axis(&self) -> f32 {
        self.state.gait_axis
    }

    pub fn swing_power(&self) -> f32 {
        self.state.power_low_pass
    }

    /// Zero all filter state
    pub fn reset(&mut self) {
        self.state = GaitState::default();
    }

    /// Run one frame. `offsets` is `None` while disengaged or untracked, in
    /// which case the gait only decays and the display values are zero.
    pub fn advance(
        &mut self,
        config: &GaitConfig,
        dt: f32,
        offsets: Option<HandOffsets>,
    ) -> GaitFrame {
        let dt = dt.max(MIN_DENOMINATOR);

        match offsets {
            Some(offsets) if offsets.is_finite() => self.update_from_offsets(config, dt, offsets),
            Some(offsets) => {
                gait_log!(WARN, "ignoring non-finite hand offsets {:?}", offsets);
                self.decay(config, dt);
                self.idle_frame()
            }
            None => {
                self.decay(config, dt);
                self.idle_frame()
            }
        }
    }

    /// Pull gait axis and swing power toward zero
    pub fn decay(&mut self, config: &GaitConfig, dt: f32) {
        self.state.decay(dt.max(MIN_DENOMINATOR), config.decay_tau);
    }

    fn idle_frame(&self) -> GaitFrame {
        GaitFrame {
            left_signal_m: 0.0,
            right_signal_m: 0.0,
            swing_power: 0.0,
            gait_axis: self.state.gait_axis,
        }
    }

    fn update_from_offsets(&mut self, config: &GaitConfig, dt: f32, offsets: HandOffsets) -> GaitFrame {
        let state = &mut self.state;

        // Baselines only follow the hands while they are near rest
        let a_base = ema_alpha(dt, config.baseline_tau);
        let freeze = config.baseline_freeze_abs_signal;
        if (offsets.left - state.baseline_left).abs() <= freeze {
            state.baseline_left = lerp(state.baseline_left, offsets.left, a_base);
        }
        if (offsets.right - state.baseline_right).abs() <= freeze {
            state.baseline_right = lerp(state.baseline_right, offsets.right, a_base);
        }

        let signal_left = offsets.left - state.baseline_left;
        let signal_right = offsets.right - state.baseline_right;

        let velocity_left = (signal_left - state.prev_signal_left) / dt;
        let velocity_right = (signal_right - state.prev_signal_right) / dt;
        state.prev_signal_left = signal_left;
        state.prev_signal_right = signal_right;

        let raw_power = velocity_left.abs() + velocity_right.abs();
        if !raw_power.is_finite() {
            gait_log!(WARN, "swing power overflowed for offsets {:?}", offsets);
            state.decay(dt, config.decay_tau);
            return self.idle_frame();
        }

        let a_power = ema_alpha(dt, config.power_tau);
        state.power_low_pass = lerp(state.power_low_pass, raw_power, a_power);

        let swing_power = state.power_low_pass;

        if swing_power <= config.power_dead {
            state.decay(dt, config.decay_tau);
        } else {
            let lo = config.power_dead.max(1e-3);
            let hi = config.power_at_run.max(lo + 1e-3);
            let target = inverse_lerp(lo, hi, swing_power);
            state.gait_axis = lerp(state.gait_axis, target, a_power).clamp(-1.0, 1.0);
        }

        gait_log!(
            TRACE,
            "signal=({:.3}, {:.3}) power={:.3} axis={:.3}",
            signal_left,
            signal_right,
            swing_power,
            state.gait_axis
        );

        GaitFrame {
            left_signal_m: signal_left,
            right_signal_m: signal_right,
            swing_power,
            gait_axis: state.gait_axis,
        }
    }
}
