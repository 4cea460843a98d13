//! Declarative scene descriptions.
//!
//! A scene file is JSON with three optional sections:
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "aspect_ratio": 1.7778, "lookfrom": [0, 0, 0] },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass": { "type": "dielectric", "ior": 1.5 }
//!   },
//!   "objects": [
//!     { "type": "sphere", "center": [0, -100.5, -1], "radius": 100, "material": "ground" }
//!   ]
//! }
//! ```
//!
//! Every material is built once; all spheres naming it share the instance.

use crate::camera::{Background, Camera, CameraConfig, ConfigError};
use crate::sampling::{gen_f32, gen_range_f32};
use crate::{Dielectric, HittableList, Lambertian, Material, Metal, Sphere};
use glint_math::{Color, Vec3};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading or building a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object {index} references unknown material {name:?}")]
    UnknownMaterial { index: usize, name: String },

    #[error("Invalid camera: {0}")]
    Camera(#[from] ConfigError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera block of a scene file. Missing fields take the camera defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub vfov: f32,
    pub lookfrom: [f32; 3],
    pub lookat: [f32; 3],
    pub vup: [f32; 3],
    pub defocus_angle: f32,
    pub focus_dist: f32,
    pub background: Background,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for CameraDesc {
    fn from(config: &CameraConfig) -> Self {
        Self {
            aspect_ratio: config.aspect_ratio,
            image_width: config.image_width,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            vfov: config.vfov,
            lookfrom: config.lookfrom.to_array(),
            lookat: config.lookat.to_array(),
            vup: config.vup.to_array(),
            defocus_angle: config.defocus_angle,
            focus_dist: config.focus_dist,
            background: config.background,
        }
    }
}

impl From<&CameraDesc> for CameraConfig {
    fn from(desc: &CameraDesc) -> Self {
        Self {
            aspect_ratio: desc.aspect_ratio,
            image_width: desc.image_width,
            samples_per_pixel: desc.samples_per_pixel,
            max_depth: desc.max_depth,
            vfov: desc.vfov,
            lookfrom: Vec3::from_array(desc.lookfrom),
            lookat: Vec3::from_array(desc.lookat),
            vup: Vec3::from_array(desc.vup),
            defocus_angle: desc.defocus_angle,
            focus_dist: desc.focus_dist,
            background: desc.background,
        }
    }
}

/// A material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: [f32; 3],
    },
    Metal {
        albedo: [f32; 3],
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        ior: f32,
    },
}

impl MaterialDesc {
    pub fn build(&self) -> Arc<dyn Material> {
        match *self {
            MaterialDesc::Lambertian { albedo } => {
                Arc::new(Lambertian::new(Color::from_array(albedo)))
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                Arc::new(Metal::new(Color::from_array(albedo), fuzz))
            }
            MaterialDesc::Dielectric { ior } => Arc::new(Dielectric::new(ior)),
        }
    }
}

/// A scene object definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: [f32; 3],
        radius: f32,
        material: String,
    },
}

/// A complete scene file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDesc,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

/// A scene ready to render.
pub struct Scene {
    pub camera: Camera,
    pub world: HittableList,
}

impl SceneDescription {
    /// Parse a scene from JSON text.
    pub fn from_json(text: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scene file from disk.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let scene = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded scene {}: {} materials, {} objects",
            path.display(),
            scene.materials.len(),
            scene.objects.len()
        );
        Ok(scene)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig::from(&self.camera)
    }

    /// Instantiate the materials and objects.
    pub fn build_world(&self) -> SceneResult<HittableList> {
        let materials: BTreeMap<&str, Arc<dyn Material>> = self
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), desc.build()))
            .collect();

        let mut world = HittableList::new();
        for (index, object) in self.objects.iter().enumerate() {
            match object {
                ObjectDesc::Sphere {
                    center,
                    radius,
                    material,
                } => {
                    let material = materials.get(material.as_str()).ok_or_else(|| {
                        SceneError::UnknownMaterial {
                            index,
                            name: material.clone(),
                        }
                    })?;
                    world.add(Box::new(Sphere::new(
                        Vec3::from_array(*center),
                        *radius,
                        Arc::clone(material),
                    )));
                }
            }
        }

        Ok(world)
    }

    /// Validate the camera and build the world.
    pub fn build(&self) -> SceneResult<Scene> {
        let camera = self.camera_config().build()?;
        let world = self.build_world()?;
        Ok(Scene { camera, world })
    }

    /// The classic "many spheres" scene: a ground plane, three large spheres
    /// (glass, matte, metal) and a grid of small random spheres.
    pub fn demo(rng: &mut dyn RngCore) -> Self {
        let mut scene = SceneDescription {
            camera: CameraDesc::from(
                &CameraConfig::new()
                    .with_resolution(400, 16.0 / 9.0)
                    .with_quality(50, 10)
                    .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
                    .with_lens(20.0, 0.6, 10.0),
            ),
            ..Default::default()
        };

        let mut material = |name: String, desc: MaterialDesc| {
            scene.materials.insert(name.clone(), desc);
            name
        };
        let ground = material("ground".into(), MaterialDesc::Lambertian { albedo: [0.5; 3] });
        let glass = material("glass".into(), MaterialDesc::Dielectric { ior: 1.5 });
        let matte = material(
            "matte".into(),
            MaterialDesc::Lambertian {
                albedo: [0.4, 0.2, 0.1],
            },
        );
        let metal = material(
            "metal".into(),
            MaterialDesc::Metal {
                albedo: [0.7, 0.6, 0.5],
                fuzz: 0.0,
            },
        );

        let mut small = Vec::new();
        for a in -5..5 {
            for b in -5..5 {
                let center = Vec3::new(
                    a as f32 + 0.9 * gen_f32(rng),
                    0.2,
                    b as f32 + 0.9 * gen_f32(rng),
                );
                if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                    continue;
                }

                let choose_mat = gen_f32(rng);
                let name = if choose_mat < 0.8 {
                    let albedo = [(); 3].map(|_| gen_f32(rng) * gen_f32(rng));
                    material(format!("diffuse_{a}_{b}"), MaterialDesc::Lambertian { albedo })
                } else if choose_mat < 0.95 {
                    let albedo = [(); 3].map(|_| gen_range_f32(rng, 0.5, 1.0));
                    let fuzz = gen_range_f32(rng, 0.0, 0.5);
                    material(format!("metal_{a}_{b}"), MaterialDesc::Metal { albedo, fuzz })
                } else {
                    glass.clone()
                };
                small.push((center, name));
            }
        }

        let mut sphere = |center: [f32; 3], radius: f32, material: String| {
            scene.objects.push(ObjectDesc::Sphere {
                center,
                radius,
                material,
            });
        };
        sphere([0.0, -1000.0, 0.0], 1000.0, ground);
        sphere([0.0, 1.0, 0.0], 1.0, glass);
        sphere([-4.0, 1.0, 0.0], 1.0, matte);
        sphere([4.0, 1.0, 0.0], 1.0, metal);
        for (center, name) in small {
            sphere(center.to_array(), 0.2, name);
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hittable;
    use glint_math::{Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SIMPLE: &str = r#"{
        "camera": {
            "image_width": 200,
            "aspect_ratio": 2.0,
            "samples_per_pixel": 4,
            "background": { "type": "solid", "color": [0.1, 0.1, 0.1] }
        },
        "materials": {
            "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
            "chrome": { "type": "metal", "albedo": [0.8, 0.8, 0.8] },
            "glass": { "type": "dielectric", "ior": 1.5 }
        },
        "objects": [
            { "type": "sphere", "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
            { "type": "sphere", "center": [0, 0, -1], "radius": 0.5, "material": "glass" },
            { "type": "sphere", "center": [1, 0, -1], "radius": 0.5, "material": "glass" }
        ]
    }"#;

    #[test]
    fn test_parse_scene() {
        let scene = SceneDescription::from_json(SIMPLE).unwrap();

        assert_eq!(scene.camera.image_width, 200);
        assert_eq!(scene.camera.aspect_ratio, 2.0);
        // Unspecified fields fall back to the camera defaults
        assert_eq!(scene.camera.max_depth, 50);
        assert_eq!(scene.camera.lookat, [0.0, 0.0, -1.0]);
        assert_eq!(
            scene.camera.background,
            Background::Solid { color: [0.1, 0.1, 0.1] }
        );

        assert_eq!(scene.materials.len(), 3);
        assert_eq!(
            scene.materials["chrome"],
            MaterialDesc::Metal { albedo: [0.8; 3], fuzz: 0.0 }
        );
        assert_eq!(scene.objects.len(), 3);
    }

    #[test]
    fn test_build_scene() {
        let scene = SceneDescription::from_json(SIMPLE).unwrap().build().unwrap();

        assert_eq!(scene.camera.image_width(), 200);
        assert_eq!(scene.camera.image_height(), 100);
        assert_eq!(scene.world.len(), 3);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = scene
            .world
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("center sphere is in view");
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_scene_uses_defaults() {
        let scene = SceneDescription::from_json("{}").unwrap();
        assert_eq!(scene.camera_config(), CameraConfig::default());
        assert!(scene.build().unwrap().world.is_empty());
    }

    #[test]
    fn test_unknown_material() {
        let text = r#"{ "objects": [
            { "type": "sphere", "center": [0, 0, -1], "radius": 0.5, "material": "missing" }
        ] }"#;
        let err = SceneDescription::from_json(text).unwrap().build_world().err().unwrap();

        assert!(matches!(
            err,
            SceneError::UnknownMaterial { index: 0, ref name } if name == "missing"
        ));
    }

    #[test]
    fn test_invalid_camera() {
        let text = r#"{ "camera": { "samples_per_pixel": 0 } }"#;
        let err = SceneDescription::from_json(text).unwrap().build().err().unwrap();

        assert!(matches!(err, SceneError::Camera(ConfigError::ZeroSamplesPerPixel)));
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneDescription::from_json("{ \"objects\": 3 }").unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }

    #[test]
    fn test_bundled_scene_file() {
        let text = include_str!("../../../scenes/three_spheres.json");
        let scene = SceneDescription::from_json(text).unwrap().build().unwrap();

        assert_eq!(scene.camera.image_width(), 400);
        assert_eq!(scene.camera.image_height(), 225);
        assert_eq!(scene.world.len(), 5);
    }

    #[test]
    fn test_demo_scene() {
        let mut rng = StdRng::seed_from_u64(5);
        let demo = SceneDescription::demo(&mut rng);

        // Ground and three large spheres, then the small ones
        assert!(demo.objects.len() > 4);
        assert!(demo.materials.contains_key("glass"));

        let scene = demo.build().unwrap();
        assert_eq!(scene.camera.image_height(), 225);
        assert_eq!(scene.world.len(), demo.objects.len());

        // Survives a trip through the file format
        let reparsed = SceneDescription::from_json(&demo.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, demo);
    }
}
