use glam::{Mat4, Vec3};

use crate::entity::{Camera, Transform};

pub trait CameraExt {
    fn proj_matrix(&self) -> Mat4;
    fn view_matrix(&self) -> Mat4;
}

impl CameraExt for Camera {
    fn proj_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far)
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}

pub trait TransformExt {
    fn model_matrix(&self) -> Mat4;
}

impl TransformExt for Transform {
    fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}
