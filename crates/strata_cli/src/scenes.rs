//! Built-in scenes.
//!
//! Each preset supplies the geometry, the subset of it sampled as lights,
//! and the camera settings it was framed for.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_renderer::{
    make_box, BvhNode, Color, Dielectric, DiffuseLight, Hittable, HittableList, Lambertian, Metal,
    Quad, RenderConfig, Sphere, Transformed, Vec3,
};

/// Scene layouts selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenePreset {
    /// Cornell box with a rotated block and a glass ball
    Cornell,
    /// Ground plane scattered with small spheres under a spherical light
    Spheres,
    /// A single emissive quad in front of the camera
    EmptyLight,
}

pub struct Scene {
    pub world: BvhNode,
    pub lights: HittableList,
    pub config: RenderConfig,
}

impl ScenePreset {
    pub fn build(self) -> Scene {
        match self {
            ScenePreset::Cornell => cornell_box(),
            ScenePreset::Spheres => spheres(),
            ScenePreset::EmptyLight => empty_light(),
        }
    }
}

fn cornell_box() -> Scene {
    let red = Lambertian::new(Color::new(0.65, 0.05, 0.05));
    let white = Lambertian::new(Color::splat(0.73));
    let green = Lambertian::new(Color::new(0.12, 0.45, 0.15));
    let light = DiffuseLight::new(Color::splat(15.0));

    let ceiling_light = || {
        Quad::new(
            Vec3::new(343.0, 554.0, 332.0),
            Vec3::new(-130.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -105.0),
            light.clone(),
        )
    };
    let glass_ball = || Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, Dielectric::new(1.5));

    let mut world = HittableList::new();
    let walls: [(Vec3, Vec3, Vec3, &Lambertian); 5] = [
        (Vec3::new(555.0, 0.0, 0.0), Vec3::Y * 555.0, Vec3::Z * 555.0, &green),
        (Vec3::ZERO, Vec3::Y * 555.0, Vec3::Z * 555.0, &red),
        (Vec3::ZERO, Vec3::X * 555.0, Vec3::Z * 555.0, &white),
        (Vec3::splat(555.0), Vec3::X * -555.0, Vec3::Z * -555.0, &white),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::X * 555.0, Vec3::Y * 555.0, &white),
    ];
    for (q, u, v, material) in walls {
        world.add(Box::new(Quad::new(q, u, v, material.clone())));
    }
    world.add(Box::new(ceiling_light()));

    let block = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    let block = Transformed::rotate_y(block, 15.0);
    world.add(Box::new(Transformed::translate(block, Vec3::new(265.0, 0.0, 295.0))));
    world.add(Box::new(glass_ball()));

    let mut lights = HittableList::new();
    lights.add(Box::new(ceiling_light()));
    lights.add(Box::new(glass_ball()));

    let config = RenderConfig {
        image_width: 600,
        aspect_ratio: 1.0,
        samples_per_pixel: 100,
        max_depth: 50,
        background: Color::ZERO,
        vfov: 40.0,
        look_from: Vec3::new(278.0, 278.0, -800.0),
        look_at: Vec3::new(278.0, 278.0, 0.0),
        vup: Vec3::Y,
        defocus_angle: 0.0,
        ..RenderConfig::default()
    };

    Scene {
        world: BvhNode::from(world),
        lights,
        config,
    }
}

fn spheres() -> Scene {
    // Fixed seed so the layout is the same on every run
    let mut rng = StdRng::seed_from_u64(0x5747);
    let mut world = HittableList::new();

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Color::splat(0.5)),
    )));

    for a in -6..6 {
        for b in -6..6 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let sphere: Box<dyn Hittable> = if choose_mat < 0.8 {
                let albedo = random_color(&mut rng, 0.0, 1.0) * random_color(&mut rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                Box::new(Sphere::moving(center, center2, 0.2, Lambertian::new(albedo)))
            } else if choose_mat < 0.95 {
                let albedo = random_color(&mut rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Box::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz)))
            } else {
                Box::new(Sphere::new(center, 0.2, Dielectric::new(1.5)))
            };
            world.add(sphere);
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Dielectric::new(1.5))));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    let sun = || Sphere::new(Vec3::new(0.0, 12.0, 4.0), 3.0, DiffuseLight::new(Color::splat(6.0)));
    world.add(Box::new(sun()));
    let mut lights = HittableList::new();
    lights.add(Box::new(sun()));

    let config = RenderConfig {
        image_width: 400,
        aspect_ratio: 16.0 / 9.0,
        samples_per_pixel: 100,
        max_depth: 50,
        background: Color::new(0.05, 0.06, 0.1),
        vfov: 20.0,
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vup: Vec3::Y,
        defocus_angle: 0.6,
        focus_dist: 10.0,
        ..RenderConfig::default()
    };

    Scene {
        world: BvhNode::from(world),
        lights,
        config,
    }
}

fn empty_light() -> Scene {
    let panel = || {
        Quad::new(
            Vec3::new(-0.5, -0.5, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            DiffuseLight::new(Color::splat(15.0)),
        )
    };

    let mut world = HittableList::new();
    world.add(Box::new(panel()));
    let mut lights = HittableList::new();
    lights.add(Box::new(panel()));

    let config = RenderConfig {
        image_width: 100,
        samples_per_pixel: 4,
        max_depth: 1,
        background: Color::new(0.1, 0.1, 0.1),
        ..RenderConfig::default()
    };

    Scene {
        world: BvhNode::from(world),
        lights,
        config,
    }
}

fn random_color(rng: &mut StdRng, min: f32, max: f32) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}
