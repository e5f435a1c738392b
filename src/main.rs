use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use sinkhole::ability::{Ability, AbilityActivated, AbilityDeactivated, UpgradeRequest};
use sinkhole::arena::ArenaPlugin;
use sinkhole::economy::Wallet;
use sinkhole::graphics;
use sinkhole::persistence::{Persistence, TomlFileStore, PROGRESS_PATH};
use sinkhole::physics::PassThroughHooks;
use sinkhole::simulation::{SimSet, SimStartupSet, SimulationPlugin};
use sinkhole::zone::{keyboard_to_intent_system, LevelUp, RestartLevel};

/// Number keys buy upgrades; `R` restarts the level.
fn meta_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut upgrades: MessageWriter<UpgradeRequest>,
    mut restart: MessageWriter<RestartLevel>,
) {
    for (key, ability) in [
        (KeyCode::Digit1, Ability::Magnet),
        (KeyCode::Digit2, Ability::Speed),
        (KeyCode::Digit3, Ability::Shield),
    ] {
        if keys.just_pressed(key) {
            upgrades.write(UpgradeRequest { ability });
        }
    }
    if keys.just_pressed(KeyCode::KeyR) {
        restart.write(RestartLevel);
    }
}

fn announce_system(
    mut level_up: MessageReader<LevelUp>,
    mut activated: MessageReader<AbilityActivated>,
    mut deactivated: MessageReader<AbilityDeactivated>,
    wallet: Res<Wallet>,
) {
    for msg in level_up.read() {
        info!("Level {}! Coins: {}", msg.new_level, wallet.coins);
    }
    for msg in activated.read() {
        info!(
            "{} active ({:.1}s left)",
            msg.ability.label(),
            msg.total_duration
        );
    }
    for msg in deactivated.read() {
        info!("{} wore off", msg.ability.label());
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Sinkhole".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)))
    // Inserted before the plugin so its startup systems load persisted
    // upgrade levels and coins.
    .insert_resource(Persistence::new(TomlFileStore::open(PROGRESS_PATH)))
    .add_plugins(RapierPhysicsPlugin::<PassThroughHooks>::default())
    .add_plugins(SimulationPlugin::default())
    .add_plugins(ArenaPlugin)
    .add_systems(
        Startup,
        (
            graphics::setup_camera,
            graphics::setup_ground_mesh.after(SimStartupSet::Config),
        ),
    )
    .add_systems(
        Update,
        (
            (keyboard_to_intent_system, meta_input_system).before(SimSet::Input),
            (
                graphics::attach_meshes_system,
                graphics::draw_zone_mask_system,
                announce_system,
            )
                .after(SimSet::Progression),
        ),
    );

    app.run();
}
