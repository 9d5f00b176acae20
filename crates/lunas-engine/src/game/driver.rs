use std::rc::Rc;

use crate::paint::Color;
use crate::time::{FrameClock, FrameTime};

use super::callbacks::{Blur, CallbackKind, Callbacks, Focus};
use super::config::GameConfig;
use super::error::InitError;
use super::host::{ContextVersion, FrameScheduler, GraphicsContext, Host, Notification, Surface};

/// Lifecycle of a constructed driver.
///
/// Construction failures never produce a driver, so only the post-initialization
/// states are observable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    /// First frame requested; no timestamp baseline yet.
    Starting,
    /// At least one frame has run.
    Running,
}

/// Frame loop driver.
///
/// Owns the graphics context and the lifecycle callback lists. The host calls
/// [`frame`](Self::frame) for every scheduled frame; each frame runs updates,
/// clears, runs draws, presents and requests the next frame.
pub struct Game<C> {
    gl: C,
    clock: FrameClock,
    clear_color: Color,
    callbacks: Callbacks,
    state: LoopState,
}

impl<C: GraphicsContext> Game<C> {
    /// Creates the driver and requests the first frame.
    ///
    /// Looks up the configured surface, acquires a context (modern first,
    /// legacy as fallback), focuses the surface and subscribes to focus, blur
    /// and resize notifications.
    pub fn new<H>(host: &mut H, config: GameConfig) -> Result<Self, InitError>
    where
        H: Host,
        H::Surface: Surface<Context = C>,
    {
        let GameConfig {
            surface_id,
            clear_color,
            max_dt,
        } = config;

        let surface = host
            .find_surface(&surface_id)
            .ok_or_else(|| InitError::SurfaceNotFound {
                id: surface_id.clone(),
            })?;

        let gl = acquire_context(&surface)?;

        surface.focus();

        host.subscribe(Notification::Focus);
        host.subscribe(Notification::Blur);
        host.subscribe(Notification::Resize);

        let clock = match max_dt {
            Some(max) => FrameClock::with_max_dt(max),
            None => FrameClock::new(),
        };

        log::info!("loop driver initialized on surface {surface_id:?}");

        host.request_frame();

        Ok(Self {
            gl,
            clock,
            clear_color,
            callbacks: Callbacks::default(),
            state: LoopState::Starting,
        })
    }

    /// Runs one scheduled frame stamped `t_ms` and requests the next one.
    ///
    /// The first frame sets the timestamp baseline, so its delta is zero.
    pub fn frame<S>(&mut self, t_ms: f64, scheduler: &mut S) -> FrameTime
    where
        S: FrameScheduler + ?Sized,
    {
        let ft = self.clock.tick(t_ms);

        if self.state == LoopState::Starting {
            log::debug!("first frame at {t_ms:.3}ms");
            self.state = LoopState::Running;
        }

        self.update(ft.dt);
        self.draw();
        self.gl.present();

        scheduler.request_frame();
        ft
    }

    fn update(&self, dt: f32) {
        for callback in self.callbacks.update() {
            callback(dt);
        }
    }

    fn draw(&mut self) {
        self.gl.set_clear_color(self.clear_color);
        self.gl.clear();

        for callback in self.callbacks.draw() {
            callback();
        }
    }
}

impl<C> Game<C> {
    /// Appends `callback` to the list for `kind`.
    pub fn add_callback<K: CallbackKind>(&mut self, _kind: K, callback: Rc<K::Handler>) {
        log::trace!("{} callback added", K::NAME);
        self.callbacks.add::<K>(callback);
    }

    /// Removes the first occurrence of `callback` from the list for `kind`.
    ///
    /// Does nothing if the handle was never added.
    pub fn remove_callback<K: CallbackKind>(&mut self, _kind: K, callback: &Rc<K::Handler>) {
        if self.callbacks.remove::<K>(callback) {
            log::trace!("{} callback removed", K::NAME);
        }
    }

    pub fn callback_count<K: CallbackKind>(&self, _kind: K) -> usize {
        self.callbacks.len::<K>()
    }

    /// Dispatches focus-gained callbacks.
    pub fn on_focus(&self) {
        log::debug!("surface focused ({} callbacks)", self.callback_count(Focus));
        for callback in self.callbacks.focus() {
            callback();
        }
    }

    /// Dispatches focus-lost callbacks.
    pub fn on_blur(&self) {
        log::debug!("surface blurred ({} callbacks)", self.callback_count(Blur));
        for callback in self.callbacks.blur() {
            callback();
        }
    }

    /// Dispatches resize callbacks with the new window size.
    pub fn on_resize(&self, width: f32, height: f32) {
        log::debug!("window resized to {width}x{height}");
        for callback in self.callbacks.resize() {
            callback(width, height);
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Timestamp of the last frame boundary, in milliseconds.
    pub fn last_frame_time(&self) -> Option<f64> {
        self.clock.last_frame_time()
    }

    pub fn context(&self) -> &C {
        &self.gl
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.gl
    }
}

fn acquire_context<S: Surface>(surface: &S) -> Result<S::Context, InitError> {
    for version in ContextVersion::PREFERENCE {
        match surface.acquire_context(version) {
            Some(gl) => {
                log::debug!("acquired {version:?} graphics context");
                return Ok(gl);
            }
            None => log::warn!("{version:?} graphics context unavailable"),
        }
    }

    Err(InitError::NoContext)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::game::callbacks::{
        BlurFn, Draw, DrawFn, FocusFn, Resize, ResizeFn, Update, UpdateFn,
    };

    type Log = Rc<RefCell<Vec<String>>>;

    struct FakeContext {
        version: ContextVersion,
        log: Log,
    }

    impl GraphicsContext for FakeContext {
        fn set_clear_color(&mut self, color: Color) {
            self.log
                .borrow_mut()
                .push(format!("clear_color({},{},{},{})", color.r, color.g, color.b, color.a));
        }

        fn clear(&mut self) {
            self.log.borrow_mut().push("clear".to_string());
        }

        fn present(&mut self) {
            self.log.borrow_mut().push("present".to_string());
        }
    }

    #[derive(Clone)]
    struct FakeSurface {
        versions: Vec<ContextVersion>,
        log: Log,
    }

    impl Surface for FakeSurface {
        type Context = FakeContext;

        fn acquire_context(&self, version: ContextVersion) -> Option<FakeContext> {
            self.log.borrow_mut().push(format!("acquire({version:?})"));
            self.versions.contains(&version).then(|| FakeContext {
                version,
                log: self.log.clone(),
            })
        }

        fn focus(&self) {
            self.log.borrow_mut().push("focus_surface".to_string());
        }
    }

    struct FakeHost {
        surfaces: HashMap<String, FakeSurface>,
        subscriptions: Vec<Notification>,
        frame_requests: usize,
        log: Log,
    }

    impl FakeHost {
        fn with_versions(versions: &[ContextVersion]) -> Self {
            let log = Log::default();
            let mut surfaces = HashMap::new();
            surfaces.insert(
                "lunasCanvas".to_string(),
                FakeSurface {
                    versions: versions.to_vec(),
                    log: log.clone(),
                },
            );
            Self {
                surfaces,
                subscriptions: Vec::new(),
                frame_requests: 0,
                log,
            }
        }

        fn modern() -> Self {
            Self::with_versions(&[ContextVersion::Modern, ContextVersion::Legacy])
        }

        fn take_log(&self) -> Vec<String> {
            std::mem::take(&mut *self.log.borrow_mut())
        }
    }

    impl FrameScheduler for FakeHost {
        fn request_frame(&mut self) {
            self.frame_requests += 1;
            self.log.borrow_mut().push("request_frame".to_string());
        }
    }

    impl Host for FakeHost {
        type Surface = FakeSurface;

        fn find_surface(&self, id: &str) -> Option<FakeSurface> {
            self.surfaces.get(id).cloned()
        }

        fn subscribe(&mut self, notification: Notification) {
            self.subscriptions.push(notification);
        }
    }

    fn game(host: &mut FakeHost) -> Game<FakeContext> {
        let game = Game::new(host, GameConfig::default()).unwrap();
        host.take_log();
        game
    }

    fn recording_update(log: &Log, tag: &'static str) -> UpdateFn {
        let log = log.clone();
        Rc::new(move |dt: f32| log.borrow_mut().push(format!("{tag}({dt:.3})")))
    }

    fn recording_draw(log: &Log, tag: &'static str) -> DrawFn {
        let log = log.clone();
        Rc::new(move || log.borrow_mut().push(tag.to_string()))
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn construction_subscribes_and_requests_first_frame() {
        let mut host = FakeHost::modern();
        let game = Game::new(&mut host, GameConfig::default()).unwrap();

        assert_eq!(game.state(), LoopState::Starting);
        assert_eq!(game.context().version, ContextVersion::Modern);
        assert_eq!(
            host.subscriptions,
            vec![Notification::Focus, Notification::Blur, Notification::Resize]
        );
        assert_eq!(host.frame_requests, 1);
        assert_eq!(
            host.take_log(),
            vec!["acquire(Modern)", "focus_surface", "request_frame"]
        );
    }

    #[test]
    fn missing_surface_fails() {
        let mut host = FakeHost::modern();
        let err = Game::new(&mut host, GameConfig::default().surface_id("elsewhere"))
            .err()
            .unwrap();

        assert_eq!(
            err,
            InitError::SurfaceNotFound {
                id: "elsewhere".into()
            }
        );
        assert!(host.subscriptions.is_empty());
        assert_eq!(host.frame_requests, 0);
    }

    #[test]
    fn falls_back_to_legacy_context() {
        let mut host = FakeHost::with_versions(&[ContextVersion::Legacy]);
        let game = Game::new(&mut host, GameConfig::default()).unwrap();

        assert_eq!(game.context().version, ContextVersion::Legacy);
        assert_eq!(host.take_log()[..2], ["acquire(Modern)", "acquire(Legacy)"]);
    }

    #[test]
    fn no_context_fails() {
        let mut host = FakeHost::with_versions(&[]);
        let err = Game::new(&mut host, GameConfig::default()).err().unwrap();

        assert_eq!(err, InitError::NoContext);
        assert_eq!(host.frame_requests, 0);
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn frame_deltas_follow_timestamps() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let f: UpdateFn = Rc::new(move |dt: f32| sink.borrow_mut().push(dt));
        game.add_callback(Update, f);

        for t in [1000.0, 1016.0, 1032.0] {
            game.frame(t, &mut host);
        }

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], 0.0);
        assert!((seen[1] - 0.016).abs() < 1e-6);
        assert!((seen[2] - 0.016).abs() < 1e-6);
        assert_eq!(game.last_frame_time(), Some(1032.0));
        assert_eq!(game.state(), LoopState::Running);
    }

    #[test]
    fn frame_runs_update_clear_draw_present_then_schedules() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);
        let log = host.log.clone();

        game.add_callback(Draw, recording_draw(&log, "draw"));
        game.add_callback(Update, recording_update(&log, "update"));

        let ft = game.frame(1000.0, &mut host);

        assert_eq!(ft.frame_index, 0);
        assert_eq!(
            host.take_log(),
            vec![
                "update(0.000)",
                "clear_color(0,0,0,1)",
                "clear",
                "draw",
                "present",
                "request_frame",
            ]
        );
        assert_eq!(host.frame_requests, 2);
    }

    #[test]
    fn removed_update_is_not_invoked() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);
        let log = host.log.clone();

        let f = recording_update(&log, "f");
        game.add_callback(Update, f.clone());
        game.frame(0.0, &mut host);

        game.remove_callback(Update, &f);
        game.frame(16.0, &mut host);

        let calls: Vec<String> = host
            .take_log()
            .into_iter()
            .filter(|l| l.starts_with("f("))
            .collect();
        assert_eq!(calls, vec!["f(0.000)"]);
        assert_eq!(game.callback_count(Update), 0);
    }

    #[test]
    fn duplicate_draw_runs_twice_in_order() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);
        let log = host.log.clone();

        let a = recording_draw(&log, "a");
        let b = recording_draw(&log, "b");
        game.add_callback(Draw, a.clone());
        game.add_callback(Draw, b);
        game.add_callback(Draw, a);

        game.frame(0.0, &mut host);

        let draws: Vec<String> = host
            .take_log()
            .into_iter()
            .filter(|l| l == "a" || l == "b")
            .collect();
        assert_eq!(draws, vec!["a", "b", "a"]);
    }

    #[test]
    fn custom_clear_color_is_used() {
        let mut host = FakeHost::modern();
        let config = GameConfig::default().clear_color(Color::from_premul(0.5, 0.0, 0.0, 1.0));
        let mut game = Game::new(&mut host, config).unwrap();
        host.take_log();

        game.frame(0.0, &mut host);
        assert!(host.take_log().contains(&"clear_color(0.5,0,0,1)".to_string()));
    }

    #[test]
    fn max_dt_clamps_delta() {
        let mut host = FakeHost::modern();
        let mut game = Game::new(&mut host, GameConfig::default().max_dt(0.1)).unwrap();

        game.frame(0.0, &mut host);
        let ft = game.frame(5000.0, &mut host);
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    // ── host notifications ───────────────────────────────────────────────

    #[test]
    fn focus_blur_resize_dispatch_to_their_lists() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);
        let log = host.log.clone();

        let focus: FocusFn = {
            let log = log.clone();
            Rc::new(move || log.borrow_mut().push("focus".to_string()))
        };
        let blur: BlurFn = {
            let log = log.clone();
            Rc::new(move || log.borrow_mut().push("blur".to_string()))
        };
        let resize: ResizeFn = {
            let log = log.clone();
            Rc::new(move |w: f32, h: f32| log.borrow_mut().push(format!("resize({w},{h})")))
        };

        game.add_callback(Focus, focus);
        game.add_callback(Blur, blur);
        game.add_callback(Resize, resize.clone());

        game.on_focus();
        game.on_blur();
        game.on_resize(800.0, 600.0);

        game.remove_callback(Resize, &resize);
        game.on_resize(1.0, 1.0);

        assert_eq!(host.take_log(), vec!["focus", "blur", "resize(800,600)"]);
    }

    #[test]
    fn removing_unregistered_callback_is_noop() {
        let mut host = FakeHost::modern();
        let mut game = game(&mut host);

        let stranger: DrawFn = Rc::new(|| {});
        game.remove_callback(Draw, &stranger);

        assert_eq!(game.callback_count(Draw), 0);
    }
}
