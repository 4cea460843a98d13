//! Camera configuration, ray generation and radiance evaluation.
//!
//! A [`CameraConfig`] is plain mutable data. [`CameraConfig::build`]
//! validates it and derives the viewport basis once, producing an immutable
//! [`Camera`] that is safe to share across render threads.

use crate::hittable::Hittable;
use crate::sampling::{random_in_unit_disk, sample_square};
use glint_math::{Color, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound of the ray parameter interval used for every hit query.
/// Keeps bounce rays from re-hitting the surface they start on.
pub const HIT_EPSILON: f32 = 0.001;

/// Errors detected while validating a camera configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image width must be positive")]
    ZeroImageWidth,

    #[error("samples per pixel must be positive")]
    ZeroSamplesPerPixel,

    #[error("max depth must be positive")]
    ZeroMaxDepth,

    #[error("aspect ratio must be finite and positive, got {0}")]
    InvalidAspectRatio(f32),

    #[error("vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("focus distance must be finite and positive, got {0}")]
    InvalidFocusDistance(f32),

    #[error("defocus angle must be in [0, 180) degrees, got {0}")]
    InvalidDefocusAngle(f32),

    #[error("lookfrom and lookat must be distinct points")]
    DegenerateViewDirection,

    #[error("up vector {0} is parallel to the view direction")]
    DegenerateUpVector(Vec3),
}

/// What a ray that escapes the scene sees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// Vertical white-to-sky-blue gradient.
    #[default]
    SkyGradient,
    /// Constant color.
    Solid { color: [f32; 3] },
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::SkyGradient => sky_gradient(ray),
            Background::Solid { color } => Color::from_array(*color),
        }
    }
}

/// Compute sky gradient background.
///
/// White straight down, (0.5, 0.7, 1.0) straight up, linear in between.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// User-facing camera settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    // Camera positioning
    pub vfov: f32, // Vertical field of view in degrees
    pub lookfrom: Point3,
    pub lookat: Point3,
    pub vup: Vec3,

    // Lens settings
    pub defocus_angle: f32, // Variation angle of rays through each pixel
    pub focus_dist: f32,    // Distance from camera to plane of perfect focus

    pub background: Background,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 50,
            vfov: 90.0,
            lookfrom: Point3::new(0.0, 0.0, 0.0),
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Background::SkyGradient,
        }
    }
}

impl CameraConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio (width / height).
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Point3, lookat: Point3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Image height derived from width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        let height = f64::from(self.image_width) / f64::from(self.aspect_ratio);

        // aspect_ratio only carries f32 precision: a quotient that close to an
        // integer is that integer (400 / (16/9) is 225, not 224)
        let nearest = height.round();
        let height = if (height - nearest).abs() <= height * f64::from(f32::EPSILON) {
            nearest
        } else {
            height.floor()
        };

        (height as u32).max(1)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.image_width == 0 {
            return Err(ConfigError::ZeroImageWidth);
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::ZeroSamplesPerPixel);
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(ConfigError::InvalidFov(self.vfov));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return Err(ConfigError::InvalidFocusDistance(self.focus_dist));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(ConfigError::InvalidDefocusAngle(self.defocus_angle));
        }
        Ok(())
    }

    /// Validate the settings and derive the render-time camera.
    pub fn build(&self) -> Result<Camera, ConfigError> {
        self.validate()?;

        let image_height = self.image_height();
        let center = self.lookfrom;

        // Calculate camera basis vectors
        let w = (self.lookfrom - self.lookat)
            .try_normalize()
            .ok_or(ConfigError::DegenerateViewDirection)?;
        let u = self
            .vup
            .cross(w)
            .try_normalize()
            .ok_or(ConfigError::DegenerateUpVector(self.vup))?;
        let v = w.cross(u);

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * (self.image_width as f32 / image_height as f32);

        // Rows grow downward in image space, so viewport_v runs along -v
        let viewport_u = viewport_width * u;
        let viewport_v = viewport_height * -v;

        let pixel_delta_u = viewport_u / self.image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - self.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();

        log::debug!(
            "Camera: {}x{}, {} spp, depth {}, vfov {}",
            self.image_width,
            image_height,
            self.samples_per_pixel,
            self.max_depth,
            self.vfov
        );

        Ok(Camera {
            config: self.clone(),
            image_height,
            pixel_samples_scale: 1.0 / self.samples_per_pixel as f32,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
        })
    }
}

/// Render-time camera state, derived once from a validated [`CameraConfig`].
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    image_height: u32,
    pixel_samples_scale: f32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// The configuration this camera was built from.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.config.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.config.max_depth
    }

    /// Averaging divisor: 1 / samples_per_pixel.
    pub fn pixel_samples_scale(&self) -> f32 {
        self.pixel_samples_scale
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Orthonormal camera basis `(u, v, w)`; the camera looks along `-w`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    /// Generate a jittered ray through pixel (i, j).
    ///
    /// The ray starts at the camera center, or at a random point on the
    /// defocus disk when `defocus_angle > 0`.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Radiance carried back along `ray`, entered at bounce `depth`.
    ///
    /// Each scatter multiplies the throughput by the material attenuation;
    /// absorption or running out of depth yields black, escaping the scene
    /// yields the background. Iterative, but equal to the recursive
    /// `attenuation * ray_color(scattered, depth + 1)` definition.
    pub fn ray_color(
        &self,
        ray: &Ray,
        world: &dyn Hittable,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut throughput = Color::ONE;
        let mut ray = *ray;

        for _ in depth..self.config.max_depth {
            let Some(rec) = world.hit(&ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
                return throughput * self.config.background.color(&ray);
            };

            match rec.material.scatter(&ray, &rec, rng) {
                Some(result) => {
                    throughput *= result.attenuation;
                    ray = result.scattered;
                }
                None => return Color::ZERO,
            }
        }

        Color::ZERO
    }
}
