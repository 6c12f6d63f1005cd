use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowId};

use crate::config::LaunchConfig;
use crate::core::Processor;
use crate::device::{Gpu, GpuInit, PresentOutcome, Presenter};
use crate::input::platform::winit::dispatch_window_event;
use crate::input::{CursorKind, InputSink};
use crate::scheduler::{Poll, RedrawAction};

/// Runs a started processor in a window until it is closed or a callback
/// fails.
pub fn run_windowed(processor: Processor, config: &LaunchConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = WindowApp::new(processor, config);

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    let scheduler = app.processor.scheduler();
    log::info!(
        "window closed after {} draws and {} replays",
        scheduler.draws(),
        scheduler.replays()
    );
    app.error.map_or(Ok(()), Err)
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Display {
    surface: WindowSurface,
    presenter: Presenter,
    /// Canvas size the window was last sized for, in logical pixels.
    canvas: (u32, u32),
    cursor: Option<CursorKind>,
}

struct WindowApp {
    processor: Processor,
    title: String,
    gpu_init: GpuInit,
    display: Option<Display>,
    error: Option<anyhow::Error>,
}

impl WindowApp {
    fn new(processor: Processor, config: &LaunchConfig) -> Self {
        Self {
            processor,
            title: config.title.clone(),
            gpu_init: config.gpu.clone(),
            display: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn create_display(&self, event_loop: &ActiveEventLoop) -> Result<Display> {
        let ctx = self.processor.context();
        let canvas = (ctx.width, ctx.height);
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(canvas.0, canvas.1));

        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = &self.gpu_init;

        let surface = WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let presenter = surface.with_gpu(|gpu| Presenter::new(gpu));
        Ok(Display {
            surface,
            presenter,
            canvas,
            cursor: Some(CursorKind::Arrow),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let action = match self.processor.on_redraw_requested(Instant::now()) {
            Ok(action) => action,
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("draw failed")),
        };

        let Some(display) = self.display.as_mut() else {
            return;
        };
        sync_window(display, &self.processor);
        if action == RedrawAction::Skip {
            return;
        }

        let Display {
            surface, presenter, ..
        } = display;
        let presented = surface.with_mut(|fields| {
            if let Some(image) = self.processor.framebuffer() {
                presenter.upload(fields.gpu, image);
            }
            fields.window.pre_present_notify();
            fields.gpu.present(presenter)
        });

        match presented {
            Ok(PresentOutcome::Presented) => {}
            Ok(outcome) => {
                log::debug!("present: {outcome:?}");
                surface.with_window(|w| w.request_redraw());
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(display) = self.display.as_mut() else {
            return;
        };
        let scale = display.surface.with_window(|w| w.scale_factor());
        let logical: LogicalSize<u32> = size.to_logical(scale);

        display.surface.with_gpu_mut(|gpu| gpu.resize(size.width, size.height));
        if logical.width > 0 && logical.height > 0 {
            display.canvas = (logical.width, logical.height);
            self.processor.update_size(logical.width, logical.height);
        }
        display.surface.with_window(|w| w.request_redraw());
    }
}

/// Brings the window in line with what the sketch asked for during the
/// last callback: canvas size and cursor.
fn sync_window(display: &mut Display, processor: &Processor) {
    let ctx = processor.context();
    let window = display.surface.borrow_window();

    if (ctx.width, ctx.height) != display.canvas {
        display.canvas = (ctx.width, ctx.height);
        // The resulting Resized event reports the size actually granted.
        let _ = window.request_inner_size(LogicalSize::new(ctx.width, ctx.height));
    }

    if ctx.cursor != display.cursor {
        display.cursor = ctx.cursor;
        match ctx.cursor {
            Some(kind) => {
                window.set_cursor(cursor_icon(kind));
                window.set_cursor_visible(true);
            }
            None => window.set_cursor_visible(false),
        }
    }
}

fn cursor_icon(kind: CursorKind) -> CursorIcon {
    match kind {
        CursorKind::Arrow => CursorIcon::Default,
        CursorKind::Cross => CursorIcon::Crosshair,
        CursorKind::Hand => CursorIcon::Pointer,
        CursorKind::Move => CursorIcon::Move,
        CursorKind::Text => CursorIcon::Text,
        CursorKind::Wait => CursorIcon::Wait,
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.display.is_some() {
            return;
        }
        match self.create_display(event_loop) {
            Ok(display) => {
                display.surface.with_window(|w| w.request_redraw());
                self.display = Some(display);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(display) = self.display.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            WindowEvent::Resized(size) => self.resize(size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = display.surface.with_window(|w| w.inner_size());
                self.resize(size);
            }

            WindowEvent::Occluded(occluded) => {
                self.processor.set_visible(!occluded, Instant::now());
                if !occluded {
                    display.surface.with_window(|w| w.request_redraw());
                }
            }

            other => {
                let processor = &mut self.processor;
                let result = display
                    .surface
                    .with_window(|w| dispatch_window_event(w, &other, processor));
                if let Err(e) = result {
                    self.fail(event_loop, anyhow::Error::new(e).context("input handler failed"));
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(display) = self.display.as_ref() else {
            return;
        };

        match self.processor.poll(Instant::now()) {
            Poll::Redraw => {
                display.surface.with_window(|w| w.request_redraw());
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Poll::WaitUntil(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            Poll::Idle => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
