//! SDL2 window, presentation and input.
//!
//! The window is only a collaborator of the renderer: it blits the
//! presentable ARGB8888 buffer to the screen, turns SDL events into
//! [`WindowEvent`]s and samples the keyboard and mouse into a
//! [`CameraInput`] once per frame. It also owns SDL's timer and paces the
//! main loop with a [`FrameLimiter`]. SDL errors are reported as `String`s,
//! following SDL's own convention.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;

use crate::camera::CameraInput;
use crate::timer::{FrameLimiter, FrameTime};

pub const WINDOW_WIDTH: u32 = 640;
pub const WINDOW_HEIGHT: u32 = 480;

/// A runtime toggle requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleRotation,
    CycleSampleMode,
    CycleLightingMode,
    ToggleNormalMap,
    ToggleDepthBuffer,
    ToggleBoundingBoxes,
    CycleCullMode,
    ToggleUniformClearColor,
    SaveFrame,
}

impl Action {
    fn from_keycode(keycode: Keycode) -> Option<Self> {
        let action = match keycode {
            Keycode::F2 => Action::ToggleRotation,
            Keycode::F4 => Action::CycleSampleMode,
            Keycode::F5 => Action::CycleLightingMode,
            Keycode::F6 => Action::ToggleNormalMap,
            Keycode::F7 => Action::ToggleDepthBuffer,
            Keycode::F8 => Action::ToggleBoundingBoxes,
            Keycode::F9 => Action::CycleCullMode,
            Keycode::F10 => Action::ToggleUniformClearColor,
            Keycode::X => Action::SaveFrame,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Quit,
    Resize(u32, u32),
    Action(Action),
}

pub struct Window {
    // Declared first so it is dropped before the creator it borrows from.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    frame_limiter: FrameLimiter,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared before texture_creator, so it drops first.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        log::info!("opened {width}x{height} window");
        Ok(Self {
            texture,
            texture_creator,
            canvas,
            event_pump,
            frame_limiter: FrameLimiter::new(timer_subsystem.ticks64()),
            timer_subsystem,
            width,
            height,
        })
    }

    /// Sleeps off whatever is left of the frame budget, then returns the
    /// time elapsed since the previous call.
    pub fn wait_for_next_frame(&mut self) -> FrameTime {
        let wait = self.frame_limiter.remaining(self.timer_subsystem.ticks64());
        if wait > 0 {
            std::thread::sleep(Duration::from_millis(wait));
        }
        self.frame_limiter.advance(self.timer_subsystem.ticks64())
    }

    /// Drains the SDL event queue.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => events.push(WindowEvent::Quit),
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(action) = Action::from_keycode(keycode) {
                        events.push(WindowEvent::Action(action));
                    }
                }
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => events.push(WindowEvent::Resize(w as u32, h as u32)),
                _ => {}
            }
        }
        events
    }

    /// Samples held keys and the mouse motion since the previous call.
    pub fn camera_input(&self) -> CameraInput {
        let keys = self.event_pump.keyboard_state();
        let held = |codes: &[Scancode]| codes.iter().any(|&c| keys.is_scancode_pressed(c));
        let mouse = self.event_pump.relative_mouse_state();

        CameraInput {
            forward: held(&[Scancode::W, Scancode::Up]),
            back: held(&[Scancode::S, Scancode::Down]),
            left: held(&[Scancode::A, Scancode::Left]),
            right: held(&[Scancode::D, Scancode::Right]),
            up: held(&[Scancode::Space]),
            down: held(&[Scancode::LCtrl]),
            boost: held(&[Scancode::LShift]),
            mouse_delta: (mouse.x(), mouse.y()),
            left_button: mouse.left(),
            right_button: mouse.right(),
        }
    }

    pub fn present(&mut self, buffer: &[u8]) -> Result<(), String> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), String> {
        self.canvas
            .window_mut()
            .set_title(title)
            .map_err(|e| e.to_string())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
