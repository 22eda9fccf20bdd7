use std::error::Error;
use std::path::{Path, PathBuf};

use duorast::prelude::*;
use duorast::window::{Action, WINDOW_HEIGHT, WINDOW_WIDTH};

const SAVE_PATH: &str = "frame.png";

fn load_scene(engine: &mut Engine, obj_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match obj_path {
        Some(path) => {
            let mut mesh = Mesh::from_obj(path)?;
            mesh.maps = SurfaceMaps::load_beside(path);
            mesh.transform_mut().set_position(Vec3::new(0.0, 0.0, 50.0));
            engine.add_mesh(mesh);
        }
        None => {
            log::warn!("no OBJ file given, showing a cube");
            let mut cube = Mesh::cube(1.0);
            cube.transform_mut().set_position(Vec3::new(0.0, 0.0, 6.0));
            engine.add_mesh(cube);
        }
    }
    Ok(())
}

fn apply(engine: &mut Engine, action: Action) {
    match action {
        Action::ToggleRotation => {
            engine.toggle_rotation();
        }
        Action::CycleSampleMode => {
            engine.cycle_sample_mode();
        }
        Action::CycleLightingMode => {
            engine.cycle_lighting_mode();
        }
        Action::ToggleNormalMap => {
            engine.toggle_normal_map();
        }
        Action::ToggleDepthBuffer => {
            engine.toggle_depth_buffer();
        }
        Action::ToggleBoundingBoxes => {
            engine.toggle_bounding_boxes();
        }
        Action::CycleCullMode => {
            engine.cycle_cull_mode();
        }
        Action::ToggleUniformClearColor => {
            engine.toggle_uniform_clear_color();
        }
        Action::SaveFrame => {
            if let Err(err) = engine.save_frame(SAVE_PATH) {
                log::error!("{err}");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let obj_path = std::env::args_os().nth(1).map(PathBuf::from);

    let mut window = Window::new("duorast", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(window.width(), window.height())?;
    load_scene(&mut engine, obj_path.as_deref())?;

    let mut frames = 0u32;
    let mut since_report = 0.0f32;

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h)?;
                    engine.resize(w, h)?;
                }
                WindowEvent::Action(action) => apply(&mut engine, action),
            }
        }

        let time = window.wait_for_next_frame();
        let input = window.camera_input();
        engine.update(time, &input)?;
        engine.render();
        window.present(engine.frame_buffer())?;

        frames += 1;
        since_report += time.delta;
        if since_report >= 1.0 {
            let fps = frames as f32 / since_report;
            log::debug!("{fps:.1} fps");
            window.set_title(&format!("duorast - {fps:.0} fps"))?;
            frames = 0;
            since_report = 0.0;
        }
    }

    Ok(())
}
