use crate::{
    layers::{marker::PlacementPass, style::OverlayStyle},
    prelude::HashMap,
    spatial::placement::PlacedCircle,
    Result,
};

/// Drawing backend for marker overlays (map widget, SVG writer, test double)
pub trait OverlayRenderer {
    /// Whatever the backend needs to remove a drawn overlay later
    type Handle;

    fn draw(&mut self, circle: &PlacedCircle, style: &OverlayStyle) -> Result<Self::Handle>;

    fn remove(&mut self, handle: Self::Handle);
}

/// Owns the rendered overlay handles, keyed by marker id.
///
/// Placement results never hold handles. Each applied pass removes every
/// handle and draws the whole pass again, so there is no per-marker
/// patching. Passes older than the last applied generation are dropped.
pub struct OverlayManager<R: OverlayRenderer> {
    renderer: R,
    handles: HashMap<String, R::Handle>,
    /// Ids in the order they were drawn
    draw_order: Vec<String>,
    applied_generation: Option<u64>,
}

impl<R: OverlayRenderer> OverlayManager<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            handles: HashMap::default(),
            draw_order: Vec::new(),
            applied_generation: None,
        }
    }

    /// Redraws everything from `pass`.
    ///
    /// Returns `Ok(false)` without touching anything when the pass is not
    /// newer than the one already on screen. If the renderer fails partway,
    /// the overlays drawn so far are removed again and the map is left empty
    /// with the previous generation still recorded, so retrying the same
    /// pass redraws it in full.
    pub fn apply(&mut self, pass: &PlacementPass) -> Result<bool> {
        if let Some(applied) = self.applied_generation {
            if pass.generation <= applied {
                log::debug!(
                    "Ignoring stale placement pass {} (showing {})",
                    pass.generation,
                    applied
                );
                return Ok(false);
            }
        }

        self.clear();

        for (circle, style) in pass.iter() {
            let handle = match self.renderer.draw(circle, style) {
                Ok(handle) => handle,
                Err(e) => {
                    log::warn!(
                        "Drawing '{}' failed, dropping partial pass {}: {}",
                        circle.id,
                        pass.generation,
                        e
                    );
                    self.clear();
                    return Err(e);
                }
            };
            if let Some(old) = self.handles.insert(circle.id.clone(), handle) {
                log::warn!("Duplicate marker id '{}' in placement pass", circle.id);
                self.renderer.remove(old);
            } else {
                self.draw_order.push(circle.id.clone());
            }
        }

        self.applied_generation = Some(pass.generation);
        Ok(true)
    }

    /// Removes every drawn overlay
    pub fn clear(&mut self) {
        for id in self.draw_order.drain(..) {
            if let Some(handle) = self.handles.remove(&id) {
                self.renderer.remove(handle);
            }
        }
        self.handles.clear();
    }

    pub fn handle(&self, id: &str) -> Option<&R::Handle> {
        self.handles.get(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.draw_order
    }

    pub fn applied_generation(&self) -> Option<u64> {
        self.applied_generation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
