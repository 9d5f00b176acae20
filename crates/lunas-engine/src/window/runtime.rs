use anyhow::{Context, Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{GpuContext, GpuInit};
use crate::game::{ContextVersion, FrameScheduler, Game, GameConfig, Host, Notification, Surface};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Loop driver settings. The window is registered under `game.surface_id`.
    pub game: GameConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lunas".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            game: GameConfig::default(),
        }
    }
}

type Setup = Box<dyn FnOnce(&mut Game<GpuContext>)>;

/// Entry point for the native runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window, builds the loop driver on it and runs until the window closes.
    ///
    /// `setup` runs once, right after the driver is constructed, and is where the
    /// application registers its callbacks.
    pub fn run<F>(config: RuntimeConfig, gpu_init: GpuInit, setup: F) -> Result<()>
    where
        F: FnOnce(&mut Game<GpuContext>) + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, Box::new(setup));

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Window-backed drawable surface.
#[derive(Clone)]
pub struct WindowSurface {
    window: Arc<Window>,
    gpu_init: GpuInit,
}

impl Surface for WindowSurface {
    type Context = GpuContext;

    fn acquire_context(&self, version: ContextVersion) -> Option<GpuContext> {
        let window = self.window.clone();
        match pollster::block_on(GpuContext::new(window, self.gpu_init.clone(), version)) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                log::warn!("{version:?} context unavailable: {e:#}");
                None
            }
        }
    }

    fn focus(&self) {
        self.window.focus_window();
    }
}

/// `winit` implementation of the driver's host capabilities.
pub struct WindowHost {
    surfaces: HashMap<String, Arc<Window>>,
    subscriptions: HashSet<Notification>,
    gpu_init: GpuInit,
    frame_requested: bool,
    epoch: Instant,
}

impl WindowHost {
    fn new(gpu_init: GpuInit) -> Self {
        Self {
            surfaces: HashMap::new(),
            subscriptions: HashSet::new(),
            gpu_init,
            frame_requested: false,
            epoch: Instant::now(),
        }
    }

    fn register(&mut self, id: impl Into<String>, window: Arc<Window>) {
        self.surfaces.insert(id.into(), window);
    }

    fn is_subscribed(&self, notification: Notification) -> bool {
        self.subscriptions.contains(&notification)
    }

    /// Milliseconds since the host started, from a monotonic clock.
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Consumes a pending frame request.
    fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Notification to forward for a window focus change, if the driver subscribed to it.
    fn forwarded_focus(&self, focused: bool) -> Option<Notification> {
        let notification = if focused {
            Notification::Focus
        } else {
            Notification::Blur
        };

        self.is_subscribed(notification).then_some(notification)
    }
}

/// Converts a physical window size to the logical pixels reported to resize callbacks.
fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (f32, f32) {
    let logical: LogicalSize<f64> = size.to_logical(scale_factor);
    (logical.width as f32, logical.height as f32)
}

impl FrameScheduler for WindowHost {
    fn request_frame(&mut self) {
        self.frame_requested = true;
        for window in self.surfaces.values() {
            window.request_redraw();
        }
    }
}

impl Host for WindowHost {
    type Surface = WindowSurface;

    fn find_surface(&self, id: &str) -> Option<WindowSurface> {
        self.surfaces.get(id).map(|window| WindowSurface {
            window: window.clone(),
            gpu_init: self.gpu_init.clone(),
        })
    }

    fn subscribe(&mut self, notification: Notification) {
        log::trace!("host subscription: {notification:?}");
        self.subscriptions.insert(notification);
    }
}

struct AppState {
    config: RuntimeConfig,
    setup: Option<Setup>,

    host: WindowHost,
    window_id: Option<WindowId>,
    game: Option<Game<GpuContext>>,

    error: Option<anyhow::Error>,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, setup: Setup) -> Self {
        Self {
            config,
            setup: Some(setup),
            host: WindowHost::new(gpu_init),
            window_id: None,
            game: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let window = Arc::new(window);

        self.window_id = Some(window.id());
        self.host.register(self.config.game.surface_id.clone(), window);

        let mut game = Game::new(&mut self.host, self.config.game.clone())
            .context("failed to initialize the loop driver")?;
        log::info!(
            "{:?} running on a {:?} context",
            self.config.title,
            game.context().version()
        );

        if let Some(setup) = self.setup.take() {
            setup(&mut game);
        }

        self.game = Some(game);
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>, scale_factor: f64) {
        let Some(game) = self.game.as_mut() else {
            return;
        };

        game.context_mut().resize(new_size);

        if self.host.is_subscribed(Notification::Resize) {
            let (width, height) = logical_size(new_size, scale_factor);
            game.on_resize(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if !self.host.take_frame_request() {
            return;
        }

        let Some(game) = self.game.as_mut() else {
            return;
        };

        let t = self.host.now_ms();
        game.frame(t, &mut self.host);

        if game.context().is_fatal() {
            self.fail(event_loop, anyhow!("graphics context lost"));
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.game.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Focused(focused) => {
                if let Some(game) = &self.game {
                    match self.host.forwarded_focus(focused) {
                        Some(Notification::Focus) => game.on_focus(),
                        Some(Notification::Blur) => game.on_blur(),
                        _ => {}
                    }
                }
            }

            WindowEvent::Resized(new_size) => {
                let scale = self
                    .host
                    .surfaces
                    .get(&self.config.game.surface_id)
                    .map_or(1.0, |w| w.scale_factor());
                self.resize(new_size, scale);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
