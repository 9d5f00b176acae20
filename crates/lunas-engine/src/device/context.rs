use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::game::{ContextVersion, GraphicsContext};
use crate::paint::Color;

use super::init::backends_for;
use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// wgpu rendering context bound to one window.
///
/// - creates and stores Instance/Adapter/Device/Queue for the requested version
/// - creates and configures the Surface (swapchain)
/// - implements [`GraphicsContext`]: `clear` acquires and clears a frame, which
///   stays open for the draw phase until `present`
pub struct GpuContext {
    window: Arc<Window>,
    version: ContextVersion,

    /// Frame acquired by `clear` and not yet presented. Dropped before the surface.
    frame: Option<GpuFrame>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    clear_color: Color,
    fatal: bool,
}

impl GpuContext {
    /// Creates a context of the given version bound to `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit, version: ContextVersion) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: backends_for(version),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .with_context(|| format!("no {version:?} GPU adapter available"))?;

        let required_limits = match version {
            ContextVersion::Modern => required_limits,
            ContextVersion::Legacy => {
                wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
            }
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lunas device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .context("no supported surface formats")?;

        let alpha_mode = surface::choose_alpha_mode(&surface_caps, alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        log::info!(
            "{version:?} context on {} ({:?}), format {format:?}",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self {
            window,
            version,
            frame: None,
            surface,
            device,
            queue,
            config,
            size,
            clear_color: Color::BLACK,
            fatal: false,
        })
    }

    pub fn version(&self) -> ContextVersion {
        self.version
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Whether a surface error marked this context unusable.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.frame = None;
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lunas frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    fn submit(&self, frame: GpuFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        drop(frame.view);
        self.window.pre_present_notify();
        frame.surface_texture.present();
    }

    fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::map_surface_error(
            &self.surface,
            &self.device,
            &self.config,
            self.size,
            err.clone(),
        );

        match action {
            SurfaceErrorAction::Fatal => {
                log::error!("surface error is fatal: {err}");
                self.fatal = true;
            }
            SurfaceErrorAction::Reconfigured => log::debug!("surface reconfigured after: {err}"),
            SurfaceErrorAction::SkipFrame => log::warn!("skipping frame: {err}"),
        }

        action
    }
}

impl GraphicsContext for GpuContext {
    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn clear(&mut self) {
        if self.fatal || self.size.width == 0 || self.size.height == 0 {
            return;
        }

        if self.frame.is_none() {
            match self.begin_frame() {
                Ok(frame) => self.frame = Some(frame),
                Err(err) => {
                    self.handle_surface_error(err);
                    return;
                }
            }
        }

        let Some(frame) = self.frame.as_mut() else {
            return;
        };

        let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lunas clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }

    fn present(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.submit(frame);
        }
    }
}
