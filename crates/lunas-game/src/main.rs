use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use lunas_engine::device::GpuInit;
use lunas_engine::di::{Injected, Registry, inject};
use lunas_engine::game::{
    Blur, BlurFn, Draw, DrawFn, Focus, FocusFn, Resize, ResizeFn, Update, UpdateFn,
};
use lunas_engine::logging::{LoggingConfig, init_logging};
use lunas_engine::window::{Runtime, RuntimeConfig};

/// Shared frame counters, registered as a service.
#[derive(Default)]
struct FrameStats {
    updates: AtomicU64,
    draws: AtomicU64,
}

/// Consumer that never sees the concrete `FrameStats` instance; it resolves it by name.
struct Hud {
    frame_stats: Injected<FrameStats>,
}

impl Hud {
    fn new() -> Self {
        Self {
            frame_stats: inject(None).field("frame_stats"),
        }
    }

    fn report(&self) {
        match self.frame_stats.get() {
            Ok(stats) => log::info!(
                "updates: {}, draws: {}",
                stats.updates.load(Ordering::Relaxed),
                stats.draws.load(Ordering::Relaxed)
            ),
            Err(e) => log::warn!("{e}"),
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Registry::global().add("frame_stats", FrameStats::default());

    let config = RuntimeConfig {
        title: "Lunas".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), |game| {
        let stats: Injected<FrameStats> = inject(Some("frame_stats")).field("stats");

        let update: UpdateFn = Rc::new(move |dt: f32| {
            log::debug!("{dt}");
            if let Ok(stats) = stats.get() {
                stats.updates.fetch_add(1, Ordering::Relaxed);
            }
        });

        let draw: DrawFn = Rc::new(|| {
            log::trace!("drawing");
            if let Ok(stats) = Registry::global().get_as::<FrameStats>("frame_stats") {
                stats.draws.fetch_add(1, Ordering::Relaxed);
            }
        });

        let hud = Rc::new(Hud::new());
        let on_focus: FocusFn = {
            let hud = hud.clone();
            Rc::new(move || hud.report())
        };
        let on_blur: BlurFn = Rc::new(move || hud.report());
        let on_resize: ResizeFn = Rc::new(|w: f32, h: f32| log::info!("resized to {w}x{h}"));

        game.add_callback(Update, update);
        game.add_callback(Draw, draw);
        game.add_callback(Focus, on_focus);
        game.add_callback(Blur, on_blur);
        game.add_callback(Resize, on_resize);
    })
}
