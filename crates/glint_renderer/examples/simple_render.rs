//! Simple ray tracer example.
//!
//! Builds the three-sphere scene in code and saves it as PPM.

use glint_renderer::{
    render, CameraConfig, Color, Dielectric, HittableList, Lambertian, Material, Metal,
    RenderOptions, Sphere, Vec3,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("glint - Simple Example");
    println!("======================");

    let world = build_scene();

    let camera = CameraConfig::new()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(
            Vec3::new(-2.0, 2.0, 1.0), // lookfrom
            Vec3::new(0.0, 0.0, -1.0), // lookat
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 10.0, 3.4)
        .build()?;

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel()
    );

    let start = std::time::Instant::now();
    let image = render(&camera, &world, &RenderOptions::default())?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    image.save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> HittableList {
    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let bubble: Arc<dyn Material> = Arc::new(Dielectric::new(1.0 / 1.5));
    let gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 1.0));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.2), 0.5, center)));
    world.add(Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass)));
    world.add(Box::new(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.4, bubble)));
    world.add(Box::new(Sphere::new(Vec3::new(1.0, 0.0, -1.0), 0.5, gold)));
    world
}
