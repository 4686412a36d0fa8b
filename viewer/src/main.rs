//! Interactive park viewer: walk around the scene and switch shadow
//! techniques live. WASD + mouse look, 1-9 selects a technique, L toggles
//! wireframe, Escape quits.

mod assets;
mod camera;
mod input;

use std::time::Instant;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use scene_api::{ExtractedScene, ExtractedView, FrameState, RenderBackendWindow};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

use camera::Camera;
use input::{Action, InputState};

/// Spin rate of the animated scene objects, degrees per second.
const SPIN_DEG_PER_SEC: f32 = 30.0;

struct App {
    window: Option<Window>,
    backend: Option<Box<dyn RenderBackendWindow>>,
    scene: ExtractedScene,
    prepared: bool,
    camera: Camera,
    input: InputState,
    wireframe: bool,
    spin_angle_deg: f32,
    size: (u32, u32),
    last_frame: Instant,
}

impl App {
    fn new(scene: ExtractedScene) -> Self {
        Self {
            window: None,
            backend: None,
            scene,
            prepared: false,
            camera: Camera::default(),
            input: InputState::default(),
            wireframe: false,
            spin_angle_deg: 0.0,
            size: (800, 600),
            last_frame: Instant::now(),
        }
    }

    fn apply_action(&mut self, action: Action, event_loop: &ActiveEventLoop) {
        match action {
            Action::Quit => event_loop.exit(),
            Action::ToggleWireframe => {
                self.wireframe = !self.wireframe;
                log::info!("wireframe: {}", self.wireframe);
            }
            Action::SelectTechnique(index) => {
                if let Some(backend) = &mut self.backend {
                    backend.select_technique(index);
                }
            }
        }
    }

    fn frame_state(&self) -> FrameState {
        let (width, height) = self.size;
        FrameState {
            view: ExtractedView {
                projection: self.camera.projection(width, height),
                view: self.camera.view(),
                viewport_size: self.size,
            },
            spin_angle_deg: self.spin_angle_deg,
            wireframe: self.wireframe,
        }
    }

    fn redraw(&mut self) {
        let window = match &self.window {
            Some(w) => w,
            None => return,
        };
        let phys = window.inner_size();
        self.size = (phys.width.max(1), phys.height.max(1));

        let dt = {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            dt.min(0.1)
        };
        self.spin_angle_deg += SPIN_DEG_PER_SEC * dt;
        let (forward, strafe) = self.input.movement_axes();
        self.camera.walk(forward, strafe, dt);

        if self.backend.is_none() {
            match umbra_bridge::UmbraWindowBackend::from_window(window) {
                Ok(backend) => {
                    for (i, name) in backend.technique_names().iter().enumerate() {
                        log::info!("key {}: {}", i + 1, name);
                    }
                    self.backend = Some(backend);
                }
                Err(e) => {
                    log::error!("backend init failed: {e}");
                    return;
                }
            }
        }
        let (raw_window, raw_display) = match (window.window_handle(), window.display_handle()) {
            (Ok(wh), Ok(dh)) => (wh.as_raw(), dh.as_raw()),
            _ => return,
        };
        let frame = self.frame_state();
        if let Some(backend) = &mut self.backend {
            if !self.prepared {
                if let Err(e) = backend.prepare(&self.scene) {
                    log::error!("prepare failed: {e}");
                    return;
                }
                self.prepared = true;
            }
            window.pre_present_notify();
            if let Err(e) = backend.render_frame_to_window(&frame, raw_window, raw_display) {
                log::warn!("frame dropped: {e}");
            }
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = winit::window::WindowAttributes::default()
            .with_title("Umbra Park")
            .with_inner_size(winit::dpi::LogicalSize::new(800, 600));
        let window = event_loop.create_window(attrs).expect("create window");
        let phys = window.inner_size();
        self.size = (phys.width.max(1), phys.height.max(1));
        // Capture the mouse for free-look; not every platform supports
        // confinement, so failure just leaves the cursor free.
        if window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            .is_ok()
        {
            window.set_cursor_visible(false);
        }
        self.last_frame = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.camera.apply_mouse(dx as f32, dy as f32);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical) => {
                self.size = (physical.width.max(1), physical.height.max(1));
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    let fresh = self.input.record(key, event.state);
                    if fresh {
                        if let Some(action) = input::action_for(key) {
                            self.apply_action(action, event_loop);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let asset_dir = std::env::current_dir()
        .map_err(|e| e.to_string())?
        .join("assets");
    let scene = assets::load_scene(&asset_dir);
    let event_loop = winit::event_loop::EventLoop::new().map_err(|e| e.to_string())?;
    let mut app = App::new(scene);
    event_loop.run_app(&mut app).map_err(|e| e.to_string())?;
    Ok(())
}
