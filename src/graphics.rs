use crate::ability::AbilityPickup;
use crate::classification::Classification;
use crate::config::SimConfig;
use crate::zone::{CaptureZone, MaskRadius};
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Camera looking down at the arena from a shallow angle.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 28.0, 22.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    info!("Camera spawned");
}

/// Flat ground mesh matching the arena collider.
pub fn setup_ground_mesh(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = config.arena_half_extent * 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.45, 0.3))),
    ));
}

/// Give newly spawned victims and pickups a visible body.
pub fn attach_meshes_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    q_victims: Query<(Entity, &Classification), Added<Classification>>,
    q_pickups: Query<Entity, Added<AbilityPickup>>,
) {
    for (entity, classification) in q_victims.iter() {
        let (mesh, color) = if classification.has(&config.hunter_tag) {
            (meshes.add(Capsule3d::new(0.4, 0.7)), Color::srgb(0.8, 0.2, 0.2))
        } else {
            (meshes.add(Sphere::new(0.4)), Color::srgb(0.9, 0.9, 0.8))
        };
        commands
            .entity(entity)
            .insert((Mesh3d(mesh), MeshMaterial3d(materials.add(color))));
    }
    for entity in q_pickups.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(0.4, 0.4, 0.4))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.6, 1.0))),
        ));
    }
}

/// Draw the sinkhole rim at the current mask radius.
pub fn draw_zone_mask_system(
    mut gizmos: Gizmos,
    q_zone: Query<(&Transform, &MaskRadius), With<CaptureZone>>,
) {
    for (transform, mask) in q_zone.iter() {
        let rim = Isometry3d::new(
            transform.translation + Vec3::Y * 0.02,
            Quat::from_rotation_x(FRAC_PI_2),
        );
        gizmos.circle(rim, mask.0, Color::BLACK);
    }
}
