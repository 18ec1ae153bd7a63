//! Dispatcher surface driven by the host's event loop.
//!
//! The host invokes the handler currently registered in a slot at
//! well-defined points in its loop: `setup` exactly once after window and
//! device creation, `draw` once per frame tick after setup has completed,
//! `resize` whenever a size change is observed. An unset slot is silently
//! skipped.
//!
//! Dispatch is cooperative and non-preemptive: a handler runs to completion
//! before control returns to the host. A handler returning `Err` is caught
//! here and reported on the error channel; the loop continues, losing only
//! the remainder of that single invocation.

use crate::bridge::{Bridge, DrawHandler, ResizeHandler, SetupHandler};
use crate::console;
use crate::host::GpuHost;

/// The three callback slots. Owned by the bridge instance; there is no
/// process-global registry.
pub(crate) struct Callbacks<H> {
    pub(crate) setup: Option<SetupHandler<H>>,
    pub(crate) draw: Option<DrawHandler<H>>,
    pub(crate) resize: Option<ResizeHandler<H>>,
}

impl<H> Default for Callbacks<H> {
    fn default() -> Self {
        Self {
            setup: None,
            draw: None,
            resize: None,
        }
    }
}

impl<H: GpuHost> Bridge<H> {
    /// Invokes the setup handler, if one is registered.
    pub fn dispatch_setup(&mut self) {
        let Some(mut handler) = self.callbacks.setup.take() else {
            return;
        };

        let result = handler(self);

        // The slot is re-read after the call: a handler that re-registered
        // its own slot wins, taking effect on the next invocation.
        if self.callbacks.setup.is_none() {
            self.callbacks.setup = Some(handler);
        }

        if let Err(err) = result {
            self.report_callback_error("setup", &err);
        }
    }

    /// Invokes the draw handler, if one is registered.
    pub fn dispatch_draw(&mut self) {
        let Some(mut handler) = self.callbacks.draw.take() else {
            return;
        };

        let result = handler(self);

        if self.callbacks.draw.is_none() {
            self.callbacks.draw = Some(handler);
        }

        if let Err(err) = result {
            self.report_callback_error("draw", &err);
        }
    }

    /// Invokes the resize handler, if one is registered, with the new size
    /// in physical pixels.
    pub fn dispatch_resize(&mut self, width: u32, height: u32) {
        let Some(mut handler) = self.callbacks.resize.take() else {
            return;
        };

        let result = handler(self, width, height);

        if self.callbacks.resize.is_none() {
            self.callbacks.resize = Some(handler);
        }

        if let Err(err) = result {
            self.report_callback_error("resize", &err);
        }
    }

    fn report_callback_error(&mut self, slot: &str, err: &anyhow::Error) {
        log::error!("{slot} callback failed: {err:#}");
        let line = format!("{}: {slot} callback failed: {err:#}", console::ERR_PREFIX);
        self.host.print(&line, true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::bridge::Bridge;
    use crate::test_host::RecordingHost;

    fn bridge() -> Bridge<RecordingHost> {
        Bridge::new(RecordingHost::default())
    }

    // ── Slot semantics ────────────────────────────────────────────────────

    #[test]
    fn unset_slots_are_skipped_silently() {
        let mut b = bridge();
        b.dispatch_setup();
        b.dispatch_draw();
        b.dispatch_resize(100, 100);

        let host = b.host();
        assert!(host.printed.is_empty());
        assert!(host.frames.is_empty());
    }

    #[test]
    fn registration_is_last_write_wins() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut b = bridge();

        let t = trace.clone();
        b.on_draw(move |_| {
            t.borrow_mut().push("first");
            Ok(())
        });
        let t = trace.clone();
        b.on_draw(move |_| {
            t.borrow_mut().push("second");
            Ok(())
        });

        b.dispatch_draw();
        b.dispatch_draw();
        assert_eq!(*trace.borrow(), vec!["second", "second"]);
    }

    #[test]
    fn reregistration_inside_a_handler_takes_effect_next_invocation() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut b = bridge();

        let t = trace.clone();
        b.on_draw(move |bridge| {
            t.borrow_mut().push("old");
            let t_inner = t.clone();
            bridge.on_draw(move |_| {
                t_inner.borrow_mut().push("new");
                Ok(())
            });
            Ok(())
        });

        b.dispatch_draw();
        b.dispatch_draw();
        assert_eq!(*trace.borrow(), vec!["old", "new"]);
    }

    #[test]
    fn setup_runs_before_first_draw_in_the_trace() {
        let trace = Rc::new(RefCell::new(Vec::new()));
        let mut b = bridge();

        let t = trace.clone();
        b.on_setup(move |_| {
            t.borrow_mut().push("setup");
            Ok(())
        });
        let t = trace.clone();
        b.on_draw(move |_| {
            t.borrow_mut().push("draw");
            Ok(())
        });

        // Host ordering: setup once, then frames.
        b.dispatch_setup();
        b.dispatch_draw();
        b.dispatch_draw();
        assert_eq!(*trace.borrow(), vec!["setup", "draw", "draw"]);
    }

    #[test]
    fn resize_receives_the_new_dimensions() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let mut b = bridge();

        let s = sizes.clone();
        b.on_resize(move |_, w, h| {
            s.borrow_mut().push((w, h));
            Ok(())
        });

        b.dispatch_resize(1024, 768);
        b.dispatch_resize(640, 480);
        assert_eq!(*sizes.borrow(), vec![(1024, 768), (640, 480)]);
    }

    // ── Error capture at the dispatch boundary ────────────────────────────

    #[test]
    fn draw_error_is_reported_and_the_loop_survives() {
        let calls = Rc::new(Cell::new(0u32));
        let mut b = bridge();

        let c = calls.clone();
        b.on_draw(move |_| {
            c.set(c.get() + 1);
            if c.get() == 1 {
                anyhow::bail!("boom");
            }
            Ok(())
        });

        b.dispatch_draw();
        b.dispatch_draw();

        // The handler ran again on the next tick.
        assert_eq!(calls.get(), 2);

        let errors: Vec<_> = b
            .host()
            .printed
            .iter()
            .filter(|(_, is_error)| *is_error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].0.starts_with("[err]:"));
        assert!(errors[0].0.contains("draw callback failed"));
        assert!(errors[0].0.contains("boom"));
    }

    #[test]
    fn setup_error_is_reported_once() {
        let mut b = bridge();
        b.on_setup(|_| anyhow::bail!("no device"));
        b.dispatch_setup();

        let host = b.host();
        assert_eq!(host.printed.len(), 1);
        assert!(host.printed[0].0.contains("setup callback failed"));
        assert!(host.printed[0].1);
    }

    // ── End-to-end scenario against the recording host ────────────────────

    #[test]
    fn triangle_scenario_records_one_submission() {
        let mut b = bridge();
        b.create_window("T", 800, 600).unwrap();

        let pipeline = Rc::new(Cell::new(None));

        let slot = pipeline.clone();
        b.on_setup(move |bridge| {
            let shader = bridge.create_shader_module("wgsl source")?;
            let built = bridge.create_render_pipeline(shader, "vs", "fs")?;
            slot.set(Some(built));
            Ok(())
        });
        b.dispatch_setup();

        let slot = pipeline.clone();
        b.on_draw(move |bridge| {
            let p = slot.get().expect("pipeline built during setup");
            bridge.draw_frame(p, 0.0, 1.0, 0.0, 1.0, 3, 1)?;
            Ok(())
        });
        b.dispatch_draw();

        let host = b.host();
        assert_eq!(host.windows.len(), 1);
        assert_eq!(host.frames.len(), 1);

        let frame = &host.frames[0];
        assert_eq!(Some(frame.pipeline), pipeline.get());
        assert_eq!(frame.clear, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(frame.vertex_count, 3);
        assert_eq!(frame.instance_count, 1);
    }
}
