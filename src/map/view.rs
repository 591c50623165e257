use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::map::projection::Viewport;

/// Callback invoked once per finished viewport change
pub type MoveEndListener = Box<dyn FnMut(&Viewport)>;

type ListenerId = u64;

#[derive(Default)]
struct Registry {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, MoveEndListener)>,
    dispatching: bool,
    /// Ids dropped while their listener vec was checked out for dispatch
    removed: Vec<ListenerId>,
}

impl Registry {
    fn insert(&mut self, listener: MoveEndListener) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Unregister `id`, handing back its listener so the caller drops it outside the borrow
    fn remove(&mut self, id: ListenerId) -> Option<MoveEndListener> {
        if self.dispatching {
            self.removed.push(id);
        }
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        Some(self.listeners.remove(index).1)
    }
}

/// Shared map state; layers hold a `Weak` to it so they never keep a torn-down map alive
pub(crate) struct MapState {
    viewport: Cell<Viewport>,
    pane_offset: Cell<(f64, f64)>,
    registry: RefCell<Registry>,
}

impl MapState {
    pub(crate) fn viewport(&self) -> Viewport {
        self.viewport.get()
    }
}

/// Handle to a move-end listener. Dropping it deregisters the listener.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    id: ListenerId,
    map: Weak<MapState>,
}

impl Subscription {
    /// Whether the listener is still registered with a live map
    pub fn is_active(&self) -> bool {
        let Some(map) = self.map.upgrade() else {
            return false;
        };
        let Ok(registry) = map.registry.try_borrow() else {
            return true;
        };
        // Mid-dispatch the listener vec is checked out; a live handle is only inactive if removed
        registry.listeners.iter().any(|(id, _)| *id == self.id)
            || (registry.dispatching && !registry.removed.contains(&self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(map) = self.map.upgrade() {
            let listener = map.registry.borrow_mut().remove(self.id);
            trace!(listener = self.id, "move-end listener removed");
            // A listener may own other subscriptions, which deregister as it drops
            drop(listener);
        }
    }
}

/// Interactive map widget: owns the viewport and notifies listeners when a move ends.
///
/// Discrete moves (pan, zoom, resize) fire a single move-end. Drags move the viewport
/// continuously and accumulate a pixel pane offset, firing only when the drag is released.
pub struct MapView {
    state: Rc<MapState>,
    dragging: bool,
    /// Drag movement not yet announced with a move-end
    drag_pending: bool,
}

impl MapView {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Rc::new(MapState {
                viewport: Cell::new(viewport),
                pane_offset: Cell::new((0.0, 0.0)),
                registry: RefCell::new(Registry::default()),
            }),
            dragging: false,
            drag_pending: false,
        }
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.state.viewport()
    }

    /// Pixel translation of content drawn before the current drag started
    pub fn pane_offset(&self) -> (f64, f64) {
        self.state.pane_offset.get()
    }

    pub(crate) fn state(&self) -> Weak<MapState> {
        Rc::downgrade(&self.state)
    }

    /// Register a callback for the end of every viewport change
    pub fn on_move_end<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Viewport) + 'static,
    {
        let id = self.state.registry.borrow_mut().insert(Box::new(listener));
        trace!(listener = id, "move-end listener added");
        Subscription {
            id,
            map: self.state(),
        }
    }

    /// Number of registered move-end listeners
    pub fn listener_count(&self) -> usize {
        self.state.registry.borrow().listeners.len()
    }

    fn update(&self, f: impl FnOnce(&mut Viewport)) {
        let mut viewport = self.state.viewport.get();
        f(&mut viewport);
        self.state.viewport.set(viewport);
    }

    /// Notify all listeners that the viewport settled
    fn fire_move_end(&mut self) {
        self.state.pane_offset.set((0.0, 0.0));
        self.drag_pending = false;

        let mut active = {
            let mut registry = self.state.registry.borrow_mut();
            registry.dispatching = true;
            std::mem::take(&mut registry.listeners)
        };

        let viewport = self.state.viewport();
        trace!(listeners = active.len(), zoom = viewport.zoom, "move end");

        for (id, listener) in active.iter_mut() {
            if self.state.registry.borrow().removed.contains(id) {
                continue;
            }
            listener(&viewport);
        }

        let stale = {
            let mut registry = self.state.registry.borrow_mut();
            let removed = std::mem::take(&mut registry.removed);
            let (mut kept, stale): (Vec<_>, Vec<_>) =
                active.into_iter().partition(|(id, _)| !removed.contains(id));
            // Listeners registered during dispatch run from the next move on
            kept.append(&mut registry.listeners);
            registry.listeners = kept;
            registry.dispatching = false;
            stale
        };
        drop(stale);
    }

    /// Pan by a pixel delta (positive dx moves the view east)
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.update(|vp| vp.pan(dx, dy));
        self.fire_move_end();
    }

    pub fn zoom_in(&mut self) {
        self.update(Viewport::zoom_in);
        self.fire_move_end();
    }

    pub fn zoom_out(&mut self) {
        self.update(Viewport::zoom_out);
        self.fire_move_end();
    }

    pub fn zoom_in_at(&mut self, px: f64, py: f64) {
        self.update(|vp| vp.zoom_in_at(px, py));
        self.fire_move_end();
    }

    pub fn zoom_out_at(&mut self, px: f64, py: f64) {
        self.update(|vp| vp.zoom_out_at(px, py));
        self.fire_move_end();
    }

    /// Update the canvas size in pixels
    pub fn resize(&mut self, width: usize, height: usize) {
        let current = self.viewport();
        if current.width == width && current.height == height {
            return;
        }
        self.update(|vp| {
            vp.width = width;
            vp.height = height;
        });
        self.fire_move_end();
    }

    /// Replace the viewport wholesale (used for "reset view")
    pub fn reset(&mut self, viewport: Viewport) {
        self.dragging = false;
        self.state.viewport.set(viewport);
        self.fire_move_end();
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    /// Move the content by a pointer delta in pixels without announcing it
    pub fn drag_by(&mut self, dx: f64, dy: f64) {
        if !self.dragging || (dx == 0.0 && dy == 0.0) {
            return;
        }
        self.update(|vp| vp.pan(-dx, -dy));
        let (ox, oy) = self.state.pane_offset.get();
        self.state.pane_offset.set((ox + dx, oy + dy));
        self.drag_pending = true;
    }

    /// Finish a drag; fires move-end if the drag moved the map
    pub fn end_drag(&mut self) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        if self.drag_pending {
            self.fire_move_end();
        }
    }
}
