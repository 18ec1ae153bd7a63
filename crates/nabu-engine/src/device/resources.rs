use nabu_bridge::{HandleClass, HostError, PipelineHandle, ShaderHandle};

/// Insert-only table of host-owned resources for one handle class.
///
/// Raw ids are table indices. The script never releases a handle, so
/// entries live until the table is dropped at shutdown; a raw id outside
/// the table is a handle the host never issued.
pub(crate) struct ResourceTable<T> {
    class: HandleClass,
    items: Vec<T>,
}

impl<T> ResourceTable<T> {
    pub(crate) fn new(class: HandleClass) -> Self {
        Self {
            class,
            items: Vec::new(),
        }
    }

    /// Stores `item` and returns the raw id it was filed under.
    pub(crate) fn insert(&mut self, item: T) -> u32 {
        let raw = self.items.len() as u32;
        self.items.push(item);
        raw
    }

    /// Looks up a raw id, reporting the table's class on failure.
    pub(crate) fn get(&self, raw: u32) -> Result<&T, HostError> {
        self.items
            .get(raw as usize)
            .ok_or(HostError::InvalidHandle {
                class: self.class,
                raw,
            })
    }
}

/// The shader-module and render-pipeline tables, keyed by the bridge's
/// typed handles so cross-class lookups cannot be expressed.
pub(crate) struct GpuResources {
    shaders: ResourceTable<wgpu::ShaderModule>,
    pipelines: ResourceTable<wgpu::RenderPipeline>,
}

impl GpuResources {
    pub(crate) fn new() -> Self {
        Self {
            shaders: ResourceTable::new(HandleClass::Shader),
            pipelines: ResourceTable::new(HandleClass::Pipeline),
        }
    }

    pub(crate) fn insert_shader(&mut self, module: wgpu::ShaderModule) -> ShaderHandle {
        ShaderHandle::from_raw(self.shaders.insert(module))
    }

    pub(crate) fn shader(&self, handle: ShaderHandle) -> Result<&wgpu::ShaderModule, HostError> {
        self.shaders.get(handle.raw())
    }

    pub(crate) fn insert_pipeline(&mut self, pipeline: wgpu::RenderPipeline) -> PipelineHandle {
        PipelineHandle::from_raw(self.pipelines.insert(pipeline))
    }

    pub(crate) fn pipeline(
        &self,
        handle: PipelineHandle,
    ) -> Result<&wgpu::RenderPipeline, HostError> {
        self.pipelines.get(handle.raw())
    }
}
