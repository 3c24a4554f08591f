use cgmath::Vector3;
use rapier3d::prelude::*;

pub fn nvec_to_cgmath(vec: &Vector<Real>) -> Vector3<f32> {
    Vector3 {
        x: vec.x,
        y: vec.y,
        z: vec.z,
    }
}

pub fn vec_to_nvec(vec: Vector3<f32>) -> Vector<Real> {
    vector![vec.x, vec.y, vec.z]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_conversion_keeps_components() {
        let v = vec3(1.0, -2.0, 3.5);
        assert_eq!(nvec_to_cgmath(&vec_to_nvec(v)), v);
    }
}
