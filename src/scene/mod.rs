pub mod nerf;
