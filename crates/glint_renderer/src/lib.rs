//! glint renderer - a small offline CPU ray tracer.
//!
//! Pipeline: [`Camera`] generates jittered (and optionally defocused) rays
//! per pixel, the scene ([`HittableList`] of [`Sphere`]s) reports the nearest
//! hit, and each hit's [`Material`] scatters the ray until it is absorbed,
//! escapes to the background, or runs out of bounces.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use glint_renderer::{render, CameraConfig, HittableList, Lambertian, RenderOptions, Sphere, Vec3};
//!
//! let mut world = HittableList::new();
//! let grey = Arc::new(Lambertian::new(Vec3::splat(0.5)));
//! world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey.clone())));
//! world.add(Box::new(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, grey)));
//!
//! let camera = CameraConfig::new().with_resolution(400, 16.0 / 9.0).build()?;
//! let image = render(&camera, &world, &RenderOptions::default())?;
//! image.save("output.ppm")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod camera;
mod hittable;
mod material;
mod output;
mod renderer;
pub mod sampling;
pub mod scene;
mod sphere;

pub use camera::{sky_gradient, Background, Camera, CameraConfig, ConfigError, HIT_EPSILON};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{color_to_rgb, parse_ppm, ImageBuffer, OutputError, PpmError, PpmImage};
pub use renderer::{render, render_pixel, render_scanline, CancelToken, RenderError, RenderOptions};
pub use scene::{Scene, SceneDescription, SceneError};
pub use sphere::Sphere;

/// Re-export math types from glint_math
pub use glint_math::{Color, Interval, Point3, Ray, Vec3};
