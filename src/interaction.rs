//! Pointer selection and the acknowledge flow.
//!
//! The controller holds the current selection and the set of acknowledge
//! requests in flight. It never talks to the backend itself: the session
//! calls [`Controller::begin_acknowledge`], performs the request, and hands
//! the outcome back through [`Controller::finish_acknowledge`]. Nothing is
//! marked acknowledged until the backend confirms.

#[cfg(test)]
#[path = "interaction_test.rs"]
mod interaction_test;

use std::collections::HashSet;

use field::point::Point;
use field::scene::{Drawable, Scene};
use serde::Serialize;
use tracing::{debug, info};
use wire::{Event, Level};

use crate::error::ShepherdError;
use crate::store::EventStore;

/// The event under the last successful click, with what the detail panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub event_id: String,
    pub status: i64,
    pub level: Level,
    pub acknowledged: bool,
    pub raw: String,
    /// The drawable that was hit, as of the frame the click landed on.
    pub drawable: Drawable,
}

impl Selection {
    fn new(event: &Event, drawable: &Drawable) -> Self {
        Self {
            event_id: event.id.clone(),
            status: event.status,
            level: event.level,
            acknowledged: event.acknowledged,
            raw: event.raw.clone(),
            drawable: drawable.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Controller {
    selection: Option<Selection>,
    pending: HashSet<String>,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    #[must_use]
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    /// Resolve a click against the frame last drawn.
    ///
    /// A hit replaces the selection and returns it. A miss, or a hit on an
    /// event that has since left the store, leaves the selection alone and
    /// returns `None`.
    pub fn on_pointer_down(&mut self, point: Point, scene: &Scene, store: &EventStore) -> Option<&Selection> {
        let drawable = scene.hit(point)?;
        let Some(event) = store.get(&drawable.event_id) else {
            debug!(id = %drawable.event_id, "interaction: hit event no longer stored");
            return None;
        };
        debug!(id = %event.id, x = point.x, y = point.y, "interaction: selected");
        self.selection = Some(Selection::new(event, drawable));
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Claim the selected event for an acknowledge request.
    ///
    /// # Errors
    ///
    /// `NoSelection` with nothing selected, `AlreadyAcknowledged` when the
    /// selection is already acknowledged, and `AckInFlight` while a request
    /// for the same id is outstanding.
    pub fn begin_acknowledge(&mut self) -> Result<String, ShepherdError> {
        let selection = self.selection.as_ref().ok_or(ShepherdError::NoSelection)?;
        if selection.acknowledged {
            return Err(ShepherdError::AlreadyAcknowledged(selection.event_id.clone()));
        }
        if !self.pending.insert(selection.event_id.clone()) {
            return Err(ShepherdError::AckInFlight(selection.event_id.clone()));
        }
        Ok(selection.event_id.clone())
    }

    /// Apply the backend's answer to an acknowledge request for `id`.
    ///
    /// On success the store entry and a matching selection become
    /// acknowledged. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Hands back the request's error unchanged.
    pub fn finish_acknowledge(
        &mut self,
        store: &mut EventStore,
        id: &str,
        result: Result<(), ShepherdError>,
    ) -> Result<(), ShepherdError> {
        self.pending.remove(id);
        result?;
        let changed = store.mark_acknowledged(id);
        if let Some(selection) = self.selection.as_mut().filter(|s| s.event_id == id) {
            selection.acknowledged = true;
        }
        info!(%id, changed, "interaction: acknowledged");
        Ok(())
    }

    /// Pick up acknowledgments that arrived over the push channel.
    pub fn refresh(&mut self, store: &EventStore) {
        if let Some(selection) = self.selection.as_mut() {
            if store.get(&selection.event_id).is_some_and(|event| event.acknowledged) {
                selection.acknowledged = true;
            }
        }
    }
}
