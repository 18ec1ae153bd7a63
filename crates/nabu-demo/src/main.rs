use std::cell::Cell;
use std::rc::Rc;

use nabu_bridge::{Bridge, PipelineHandle, Value};
use nabu_engine::device::GpuInit;
use nabu_engine::host::EngineHost;
use nabu_engine::logging::{LoggingConfig, init_logging};
use nabu_engine::window::Runtime;

const TRIANGLE_WGSL: &str = include_str!("../shaders/triangle.wgsl");

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting nabu demo");

    let mut bridge = Bridge::new(EngineHost::new(GpuInit::default()));

    // ── The "script": registration phase, runs before the event loop ─────

    bridge.create_window("nabu triangle", 800, 600)?;

    // Setup produces the pipeline; draw consumes it every frame.
    let pipeline: Rc<Cell<Option<PipelineHandle>>> = Rc::new(Cell::new(None));

    let slot = pipeline.clone();
    bridge.on_setup(move |b| {
        b.log(&[Value::from("compiling triangle shader")]);
        let shader = b.create_shader_module(TRIANGLE_WGSL)?;
        let built = b.create_render_pipeline(shader, "vs_main", "fs_main")?;
        b.log(&[Value::from("pipeline ready"), Value::from(built.raw())]);
        slot.set(Some(built));
        Ok(())
    });

    let slot = pipeline.clone();
    bridge.on_draw(move |b| {
        if let Some(p) = slot.get() {
            b.draw_frame(p, 0.06, 0.07, 0.09, 1.0, 3, 1)?;
        }
        Ok(())
    });

    bridge.on_resize(|b, width, height| {
        b.log(&[
            Value::from("resized"),
            Value::from(width),
            Value::from(height),
        ]);
        Ok(())
    });

    // ── Hand control to the host loop ─────────────────────────────────────

    Runtime::run(bridge)
}
