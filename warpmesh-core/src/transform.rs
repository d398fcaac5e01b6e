/// Model transforms for placing a mesh in the scene
use nalgebra::{Matrix4, Vector3};

/// Euler orientation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Orientation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Matrix builders for model transforms
pub struct Transform;

impl Transform {
    /// Rotation applied Z, then Y, then X
    pub fn rotation_matrix(orientation: &Orientation) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(orientation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, orientation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, orientation.z));
        rz * ry * rx
    }

    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Scale, then rotate, then translate
    pub fn model_matrix(
        offset: &Vector3<f32>,
        orientation: &Orientation,
        scale: f32,
    ) -> Matrix4<f32> {
        Self::translation_matrix(offset)
            * Self::rotation_matrix(orientation)
            * Self::scale_matrix(scale, scale, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_orientation_rotate() {
        let mut orientation = Orientation::zero();
        orientation.rotate(0.1, 0.2, 0.3);
        assert!((orientation.x - 0.1).abs() < 1e-6);
        assert!((orientation.y - 0.2).abs() < 1e-6);
        assert!((orientation.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&Orientation::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_model_matrix_order() {
        let model = Transform::model_matrix(
            &Vector3::new(1.0, 0.0, 0.0),
            &Orientation::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            2.0,
        );
        let moved = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-5);
    }
}
