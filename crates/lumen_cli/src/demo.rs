//! Built-in demo scenes.

use clap::ValueEnum;
use lumen_math::Vec3;
use lumen_renderer::{palette, BackfacePolicy, CameraConfig, Color, Material, MeshData, Scene, Sphere, StaticMesh};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Diffuse, glossy and glass spheres on a floor
    Spheres,
    /// Closed box with coloured walls and a ceiling light
    Room,
}

pub fn build(demo: DemoScene) -> Scene {
    match demo {
        DemoScene::Spheres => spheres(),
        DemoScene::Room => room(),
    }
}

fn spheres() -> Scene {
    let mut scene = Scene::new("spheres");

    let floor = Arc::new(Material::diffuse("floor", palette::GREY));
    scene.add(
        StaticMesh::new(Arc::new(MeshData::quad("floor")), floor)
            .with_transform(Vec3::new(0.0, -1.0, 0.0), 0.0, 40.0),
    );

    scene.add(
        Sphere::new(
            Vec3::new(-2.2, 0.0, 0.0),
            1.0,
            Arc::new(Material::diffuse("red", palette::RED)),
        )
        .with_name("red_ball"),
    );
    scene.add(
        Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::glossy("copper", palette::COPPER, Color::ONE, 0.4, 0.9)),
        )
        .with_name("copper_ball"),
    );
    scene.add(
        Sphere::new(
            Vec3::new(2.2, 0.0, 0.0),
            1.0,
            Arc::new(Material::glass("glass", Color::splat(0.95), 0.9, 1.5)),
        )
        .with_name("glass_ball"),
    );
    scene.add(
        StaticMesh::new(
            Arc::new(MeshData::cube("crate")),
            Arc::new(Material::diffuse("crate", palette::GREEN)),
        )
        .with_transform(Vec3::new(0.8, -0.6, 2.0), 30.0, 0.8),
    );
    scene.add(
        Sphere::new(
            Vec3::new(0.0, 6.0, 3.0),
            1.5,
            Arc::new(Material::light("sun", Color::splat(6.0))),
        )
        .with_name("sun"),
    );

    scene.camera = CameraConfig::default()
        .with_position(Vec3::new(0.0, 1.5, 7.0), Vec3::ZERO, Vec3::Y)
        .with_fov(50.0);
    scene
}

fn room() -> Scene {
    let mut scene = Scene::new("room");
    scene.ambient = Color::splat(0.1);

    // Walls are double sided, the ceiling and right wall are seen from behind
    let wall = |name: &str, color: Color, origin: Vec3, upright: bool, rotation_y: f32| {
        let mut mesh = MeshData::quad(name);
        if upright {
            // Stand the floor quad up: XZ plane to XY plane
            for face in &mut mesh.faces {
                *face = face.map(|v| Vec3::new(v.x, -v.z, v.y));
            }
        }
        StaticMesh::new(Arc::new(mesh), Arc::new(Material::diffuse(name, color)))
            .with_transform(origin, rotation_y, 6.0)
            .with_backface_policy(BackfacePolicy::FlipNormal)
    };

    scene.add(wall("floor", palette::WHITE, Vec3::new(0.0, -3.0, 0.0), false, 0.0));
    scene.add(wall("ceiling", palette::WHITE, Vec3::new(0.0, 3.0, 0.0), false, 0.0));
    scene.add(wall("back", palette::WHITE, Vec3::new(0.0, 0.0, -3.0), true, 0.0));
    scene.add(wall("left", palette::RED, Vec3::new(-3.0, 0.0, 0.0), true, 90.0));
    scene.add(wall("right", palette::GREEN, Vec3::new(3.0, 0.0, 0.0), true, 90.0));

    scene.add(
        StaticMesh::new(
            Arc::new(MeshData::cube("block")),
            Arc::new(Material::diffuse("block", palette::WHITE)),
        )
        .with_transform(Vec3::new(-1.0, -2.0, -0.8), 20.0, 2.0),
    );
    scene.add(Sphere::new(
        Vec3::new(1.2, -2.0, 0.5),
        1.0,
        Arc::new(Material::glossy("steel", palette::STEEL, Color::ONE, 0.6, 0.95)),
    ));
    scene.add(
        Sphere::new(
            Vec3::new(0.0, 2.2, 0.0),
            0.6,
            Arc::new(Material::light("lamp", Color::splat(8.0))),
        )
        .with_name("lamp"),
    );

    scene.camera = CameraConfig::default()
        .with_position(Vec3::new(0.0, 0.0, 8.5), Vec3::ZERO, Vec3::Y)
        .with_fov(45.0);
    scene
}
