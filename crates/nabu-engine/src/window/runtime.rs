use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use nabu_bridge::Bridge;

use crate::host::EngineHost;

/// Entry point for the runtime.
///
/// Takes a bridge whose script code has already run its registration phase
/// (window descriptor + callback slots) and drives the registered handlers
/// from the winit loop:
///
/// - `setup` is dispatched exactly once, after the window and GPU device
///   exist and before the first frame
/// - `draw` is dispatched once per `RedrawRequested`, re-armed continuously
/// - `resize` is dispatched after the surface has been reconfigured for the
///   new size
pub struct Runtime;

impl Runtime {
    pub fn run(bridge: Bridge<EngineHost>) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        let mut state = LoopState {
            bridge,
            setup_done: false,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct LoopState {
    bridge: Bridge<EngineHost>,
    setup_done: bool,
}

impl ApplicationHandler for LoopState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // `resumed` can fire again on some platforms; the window comes up once.
        if self.bridge.host().has_window() {
            return;
        }

        let config = self.bridge.host().window_config();
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(config.width),
                f64::from(config.height),
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.bridge.host_mut().attach_window(window) {
            log::error!("failed to initialize GPU: {e:#}");
            event_loop.exit();
            return;
        }

        // Setup runs exactly once, after window/device creation and before
        // any draw. Handler failures are reported at the dispatch boundary
        // and do not stop the loop.
        self.bridge.dispatch_setup();
        self.setup_done = true;

        self.bridge.host().request_redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces the loop.
        self.bridge.host().request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                // Reconfigure first so a handler drawing from `resize`
                // sees the new surface dimensions.
                self.bridge.host_mut().resize(new_size);
                self.bridge.dispatch_resize(new_size.width, new_size.height);
                self.bridge.host().request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(new_size) = self.bridge.host().window_size() else {
                    return;
                };
                self.bridge.host_mut().resize(new_size);
                self.bridge.dispatch_resize(new_size.width, new_size.height);
                self.bridge.host().request_redraw();
            }

            WindowEvent::RedrawRequested => {
                // Draw never runs before setup has completed.
                if !self.setup_done {
                    return;
                }
                self.bridge.dispatch_draw();
            }

            _ => {}
        }
    }
}
