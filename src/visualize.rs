use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;
use bevy_panorbit_camera::{PanOrbitCamera, PanOrbitCameraPlugin};

use crate::aggregator::SceneAggregator;
use crate::config::BrowserConfig;
use crate::playback::PlaybackClock;
use crate::types::Position;

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Resource)]
pub struct BrowserState {
    pub scenes: SceneAggregator,
    pub clock: PlaybackClock,
    pub config: BrowserConfig,
    pub show_hierarchy: bool,
    /// Row of the skeleton tree that H toggles.
    pub selected_row: usize,
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Open the viewport on whatever `scenes` currently holds. Files dropped on the
/// window replace the loaded set.
pub fn run_viewer(scenes: SceneAggregator, config: BrowserConfig) {
    let clock = PlaybackClock::new(config.playback.tick_interval());
    let [r, g, b] = config.viewer.background;

    App::new()
        .insert_resource(ClearColor(Color::rgb(r, g, b)))
        .insert_resource(BrowserState {
            scenes,
            clock,
            config,
            show_hierarchy: false,
            selected_row: 0,
        })
        .add_plugins(DefaultPlugins)
        .add_plugins(PanOrbitCameraPlugin)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (load_dropped_files, update_transport, update_tree_selection, draw_skeletons, update_status_text).chain(),
        )
        .run();
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Component)]
struct StatusText;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut config_store: ResMut<GizmoConfigStore>,
    state: Res<BrowserState>,
) {
    //// Orbit camera
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(8., 5., 8.).looking_at(Vec3::new(0., 1., 0.), Vec3::Y),
            ..default()
        },
        PanOrbitCamera::default(),
    ));

    if state.config.viewer.show_grid {
        commands.spawn(PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(10.0, 10.0)),
            material: materials.add(StandardMaterial {
                base_color: Color::rgba(1., 1., 1., 0.3),
                alpha_mode: AlphaMode::Blend,
                double_sided: true,
                cull_mode: None,
                ..default()
            }),
            ..default()
        });
    }

    let (gizmos, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    gizmos.line_width = state.config.viewer.line_width;

    commands.spawn(
        TextBundle::from_section(
            "Drop .bvh files on the window to load them\n\
            Space: play / pause\n\
            Left / Right: step frames (hold Shift for bigger steps)\n\
            Home / End: first / last frame\n\
            T: toggle skeleton tree\n\
            Up / Down: select a bone, H: hide / show it and its children\n",
            TextStyle {
                font_size: 15.,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        }),
    );

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 17.,
                color: Color::rgba(1.0, 1.0, 1.0, 0.8),
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        }),
        StatusText,
    ));
}

///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn load_dropped_files(mut events: EventReader<FileDragAndDrop>, mut state: ResMut<BrowserState>) {
    let dropped: Vec<std::path::PathBuf> = events
        .read()
        .filter_map(|event| match event {
            FileDragAndDrop::DroppedFile { path_buf, .. } => Some(path_buf.clone()),
            _ => None,
        })
        .collect();
    if dropped.is_empty() {
        return;
    }
    match state.scenes.load_dropped(&dropped) {
        Ok(report) => {
            for skipped in &report.skipped {
                warn!("{skipped}");
            }
        }
        Err(err) => warn!("ignoring drop: {err}"),
    }
    state.clock.reset();
}

fn update_transport(keyboard: Res<ButtonInput<KeyCode>>, time: Res<Time>, mut state: ResMut<BrowserState>) {
    let state = &mut *state;
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    let step = if shift {
        state.config.playback.large_step
    } else {
        state.config.playback.small_step
    };
    let playback = state.scenes.playback_mut();

    if keyboard.just_pressed(KeyCode::Space) {
        playback.toggle_play();
        state.clock.reset();
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        playback.increment_frame(step);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        playback.increment_frame(-step);
    }
    if keyboard.just_pressed(KeyCode::Home) {
        playback.go_to_start_frame();
    }
    if keyboard.just_pressed(KeyCode::End) {
        playback.go_to_end_frame();
    }
    if keyboard.just_released(KeyCode::KeyT) {
        state.show_hierarchy = !state.show_hierarchy;
    }

    if playback.is_playing() {
        for _ in 0..state.clock.advance(time.delta()) {
            playback.tick();
        }
    }
}

/// Skeleton tree cursor: Up/Down move it, H flips the selected bone and its children.
fn update_tree_selection(keyboard: Res<ButtonInput<KeyCode>>, mut state: ResMut<BrowserState>) {
    if !state.show_hierarchy {
        return;
    }
    let rows = state.scenes.node_rows().len();
    if rows == 0 {
        state.selected_row = 0;
        return;
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        state.selected_row = (state.selected_row + 1) % rows;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        state.selected_row = (state.selected_row + rows - 1) % rows;
    }
    state.selected_row = state.selected_row.min(rows - 1);

    if keyboard.just_pressed(KeyCode::KeyH) {
        let selected = state
            .scenes
            .node_rows()
            .get(state.selected_row)
            .map(|(path, name)| (path.to_path_buf(), name.to_string()));
        if let Some((path, name)) = selected {
            if let Some(hidden) = state.scenes.toggle_node_visibility(&path, &name) {
                info!("{name} in {}: {}", path.display(), if hidden { "hidden" } else { "shown" });
            }
        }
    }
}

fn to_vec3(position: &Position, units_per_meter: f32) -> Vec3 {
    Vec3::new(position.x as f32, position.y as f32, position.z as f32) / units_per_meter
}

fn draw_skeletons(mut gizmos: Gizmos, state: Res<BrowserState>) {
    let units = state.config.viewer.units_per_meter;
    for segment in state.scenes.sample_current_frame() {
        let [r, g, b, a] = segment.color.to_array();
        gizmos.line(
            to_vec3(&segment.position, units),
            to_vec3(&segment.parent_position, units),
            Color::rgba(r, g, b, a),
        );
    }
}

fn update_status_text(mut query: Query<&mut Text, With<StatusText>>, state: Res<BrowserState>) {
    let playback = state.scenes.playback();
    let mut t = format!(
        "Frame {} [{}..{}] {}\n",
        playback.active_frame(),
        playback.start_frame(),
        playback.end_frame(),
        if playback.is_playing() { "playing" } else { "paused" }
    );
    for scene in state.scenes.scenes() {
        t += &format!("{}\n", scene.path().display());
    }
    if state.show_hierarchy {
        let mut current: Option<&std::path::Path> = None;
        for (row, (path, name)) in state.scenes.node_rows().into_iter().enumerate() {
            if current != Some(path) {
                t += &format!("=============== {} ===============\n", path.display());
                current = Some(path);
            }
            let cursor = if row == state.selected_row { ">" } else { " " };
            let check = if state.scenes.is_node_hidden(path, name) { "[ ]" } else { "[x]" };
            let parent = state
                .scenes
                .description()
                .scene(path)
                .and_then(|hierarchy| hierarchy.get(name))
                .map(String::as_str)
                .unwrap_or_default();
            t += &format!("{cursor} {check} {name:.<24} {parent}\n");
        }
    }
    for mut text in &mut query {
        text.sections[0].value = t.clone();
    }
}
