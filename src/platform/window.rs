//! winit window and per-frame event pump
//!
//! The frame loop owns control flow: each `poll_events` call pumps winit
//! once without blocking and returns whatever the window reported.

use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::app::{InputEvent, InputSource, Key};
use crate::error::{DemoError, DemoResult};
use crate::settings::WindowSettings;

/// Pumps allowed for the platform to deliver the first resume
const STARTUP_PUMPS: usize = 100;
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

struct PlatformApp {
    settings: WindowSettings,
    window: Option<Arc<Window>>,
    pending: Vec<InputEvent>,
    error: Option<DemoError>,
}

impl PlatformApp {
    fn new(settings: &WindowSettings) -> Self {
        Self {
            settings: settings.clone(),
            window: None,
            pending: Vec::new(),
            error: None,
        }
    }
}

impl ApplicationHandler for PlatformApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title("fps: 0")
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height))
            .with_resizable(self.settings.resizable);
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.error = Some(e.into()),
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(input) = translate_event(&event) {
            self.pending.push(input);
        }
    }
}

/// Window plus event pump; the loop's `InputSource`
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    app: PlatformApp,
}

impl WinitPlatform {
    /// Create the event loop and pump it until the window exists
    pub fn open(settings: &WindowSettings) -> DemoResult<(Self, Arc<Window>)> {
        let mut event_loop = EventLoop::new()?;
        let mut app = PlatformApp::new(settings);

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut app);
            if let Some(err) = app.error.take() {
                return Err(err);
            }
            if let PumpStatus::Exit(code) = status {
                return Err(DemoError::Window(format!(
                    "event loop exited during startup (code {code})"
                )));
            }
            if let Some(window) = app.window.clone() {
                log::info!("Window opened at {}x{}", settings.width, settings.height);
                return Ok((Self { event_loop, app }, window));
            }
        }

        Err(DemoError::Window("window was not created".into()))
    }
}

impl InputSource for WinitPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app);
        if let PumpStatus::Exit(_) = status {
            self.app.pending.push(InputEvent::Quit);
        }
        std::mem::take(&mut self.app.pending)
    }
}

/// Map a window event to the loop's input vocabulary. `None` for events the
/// loop never sees (redraw requests, moves, scale changes).
pub fn translate_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(InputEvent::Quit),
        WindowEvent::Resized(size) => Some(InputEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput { event, .. } => {
            translate_key(event.state, event.repeat, event.physical_key)
        }
        WindowEvent::CursorMoved { .. }
        | WindowEvent::CursorEntered { .. }
        | WindowEvent::CursorLeft { .. }
        | WindowEvent::MouseInput { .. }
        | WindowEvent::MouseWheel { .. }
        | WindowEvent::Focused(_) => Some(InputEvent::Other),
        _ => None,
    }
}

/// Held keys produce nothing; only the first press and the release count
pub fn translate_key(state: ElementState, repeat: bool, key: PhysicalKey) -> Option<InputEvent> {
    match (state, repeat) {
        (_, true) => None,
        (ElementState::Pressed, false) => Some(InputEvent::KeyDown(map_key(key))),
        (ElementState::Released, false) => Some(InputEvent::Other),
    }
}

pub fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::KeyB) => Key::B,
        PhysicalKey::Code(KeyCode::KeyN) => Key::N,
        PhysicalKey::Code(KeyCode::ArrowUp) => Key::Up,
        PhysicalKey::Code(KeyCode::ArrowDown) => Key::Down,
        _ => Key::Other,
    }
}
