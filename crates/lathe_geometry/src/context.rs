//! Render contexts and the registry that owns them
//!
//! A [`RenderContext`] stands for one render device. It owns every geometry
//! built for it in an arena keyed by [`GeometryKey`], plus the generators
//! used to build them. Contexts live in a [`ContextRegistry`] and are
//! addressed by [`ContextId`]; both key types are versioned, so a key from a
//! torn-down context or a released slot never resolves again.

use slotmap::{new_key_type, SlotMap};

use crate::buffer::GeometryBuffer;
use crate::config::GeometryConfig;
use crate::descriptor::GeometryDescriptor;
use crate::error::GeometryError;
use crate::factory;
use crate::primitives::{BuiltinPrimitives, PrimitiveLibrary};
use crate::text::{FontOutlineShaper, LyonExtruder, TextPipeline};

new_key_type! {
    /// Identity of a render context
    pub struct ContextId;

    /// Slot of a built geometry inside its context
    pub struct GeometryKey;
}

/// One render device and the geometry built for it
pub struct RenderContext {
    id: ContextId,
    geometries: SlotMap<GeometryKey, GeometryBuffer>,
    primitives: Box<dyn PrimitiveLibrary>,
    text: TextPipeline,
    config: GeometryConfig,
    build_count: usize,
}

impl RenderContext {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn primitives(&self) -> &dyn PrimitiveLibrary {
        self.primitives.as_ref()
    }

    pub fn text(&self) -> &TextPipeline {
        &self.text
    }

    /// Resolve a geometry handle
    pub fn geometry(&self, key: GeometryKey) -> Option<&GeometryBuffer> {
        self.geometries.get(key)
    }

    pub fn contains(&self, key: GeometryKey) -> bool {
        self.geometries.contains_key(key)
    }

    /// Number of live geometries
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of factory builds run in this context
    pub fn build_count(&self) -> usize {
        self.build_count
    }

    /// Build `descriptor` and store the result in the arena
    pub fn build(&mut self, descriptor: &GeometryDescriptor) -> GeometryKey {
        let buffer = factory::build(descriptor, self);
        self.build_count += 1;
        self.geometries.insert(buffer)
    }

    fn remove(&mut self, key: GeometryKey) -> Option<GeometryBuffer> {
        self.geometries.remove(key)
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("id", &self.id)
            .field("geometries", &self.geometries.len())
            .field("build_count", &self.build_count)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Settings for a new [`RenderContext`]
///
/// Unset generators default to [`BuiltinPrimitives`] and a
/// [`FontOutlineShaper`] / [`LyonExtruder`] pair configured from the
/// context's [`GeometryConfig`].
#[derive(Default)]
pub struct ContextBuilder {
    config: GeometryConfig,
    primitives: Option<Box<dyn PrimitiveLibrary>>,
    text: Option<TextPipeline>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GeometryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_primitives(mut self, primitives: impl PrimitiveLibrary + 'static) -> Self {
        self.primitives = Some(Box::new(primitives));
        self
    }

    pub fn with_text_pipeline(mut self, text: TextPipeline) -> Self {
        self.text = Some(text);
        self
    }

    fn build(self, id: ContextId) -> RenderContext {
        let config = self.config;
        let primitives = self
            .primitives
            .unwrap_or_else(|| Box::new(BuiltinPrimitives));
        let text = self.text.unwrap_or_else(|| {
            let mut shaper = if config.system_fonts {
                FontOutlineShaper::with_system_fonts()
            } else {
                FontOutlineShaper::new()
            };
            if let Some(fallback) = &config.fallback_font {
                shaper = shaper.with_fallback(fallback.clone());
            }
            TextPipeline::new(shaper, LyonExtruder::new(config.tolerance))
        });

        RenderContext {
            id,
            geometries: SlotMap::with_key(),
            primitives,
            text,
            config,
            build_count: 0,
        }
    }
}

/// Owner of every live render context
#[derive(Debug, Default)]
pub struct ContextRegistry {
    contexts: SlotMap<ContextId, RenderContext>,
}

impl ContextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context and return its id
    pub fn create(&mut self, builder: ContextBuilder) -> ContextId {
        let id = self.contexts.insert_with_key(|id| builder.build(id));
        tracing::debug!("Created render context {:?}", id);
        id
    }

    pub fn get(&self, id: ContextId) -> Option<&RenderContext> {
        self.contexts.get(id)
    }

    pub fn get_mut(&mut self, id: ContextId) -> Option<&mut RenderContext> {
        self.contexts.get_mut(id)
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.contexts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.contexts.keys()
    }

    /// Drop a context together with every geometry in its arena
    ///
    /// Returns `false` if the context was already gone.
    pub fn teardown(&mut self, id: ContextId) -> bool {
        match self.contexts.remove(id) {
            Some(context) => {
                tracing::debug!(
                    "Tore down render context {:?} with {} geometries",
                    id,
                    context.geometry_count()
                );
                true
            }
            None => false,
        }
    }

    /// Release one geometry from its context
    pub fn release(&mut self, context: ContextId, key: GeometryKey) -> Result<(), GeometryError> {
        let ctx = self
            .contexts
            .get_mut(context)
            .ok_or(GeometryError::UnknownContext(context))?;
        ctx.remove(key)
            .map(|_| ())
            .ok_or(GeometryError::AlreadyReleased { context, key })
    }
}
