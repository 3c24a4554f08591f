use cgmath::{InnerSpace, Vector3};

/// Smallest denominator allowed for time steps and time constants
pub const MIN_DENOMINATOR: f32 = 1e-4;

/// Blend factor for an exponential moving average with time constant `tau`
/// over a step of `dt` seconds: `1 - exp(-dt / tau)`.
pub fn ema_alpha(dt: f32, tau: f32) -> f32 {
    1.0 - (-dt / tau.max(MIN_DENOMINATOR)).exp()
}

/// Unclamped linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
/// Returns 0 when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by at most `max_delta` along the straight line between them
pub fn move_towards(current: Vector3<f32>, target: Vector3<f32>, max_delta: f32) -> Vector3<f32> {
    let to_target = target - current;
    let distance = to_target.magnitude();
    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + to_target / distance * max_delta
}

/// Rescale `v` so its length does not exceed `max_length`
pub fn clamp_magnitude(v: Vector3<f32>, max_length: f32) -> Vector3<f32> {
    let length = v.magnitude();
    if length > max_length && length > 0.0 {
        v * (max_length / length)
    } else {
        v
    }
}

/// Drop the vertical component and normalize. `None` when nothing horizontal is left.
pub fn flatten_horizontal(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    if flat.magnitude2() > 1e-6 {
        Some(flat.normalize())
    } else {
        None
    }
}

/// Horizontal part of a velocity (y zeroed)
pub fn horizontal(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, 0.0, v.z)
}
