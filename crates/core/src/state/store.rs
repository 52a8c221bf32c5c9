use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use bubblescope_protocol::SharedStr;
use tracing::{debug, info, warn};

use super::selection::{GameType, RadiusExtent, SelectionChange, SelectionState};
use crate::error::SelectionError;
use crate::model::YearRange;

/// Slack allowed when checking a brushed range against the dataset extent;
/// pixel inversions land a few ulps outside it.
const YEAR_TOLERANCE: f64 = 1e-6;

/// Something that redraws when the selection changes.
pub trait SelectionListener {
    fn selection_changed(&mut self, state: &SelectionState, change: SelectionChange);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Holds the current selection and fans every accepted change out to the
/// registered listeners.
///
/// Fan-out is synchronous: a setter returns only after every listener has
/// run, in registration order. A rejected change leaves the state as it
/// was and notifies nobody.
pub struct SelectionStore {
    state: SelectionState,
    /// Full observed year extent of the dataset.
    year_bounds: YearRange,
    listeners: Vec<(ListenerId, Rc<RefCell<dyn SelectionListener>>)>,
    next_listener: u64,
}

impl SelectionStore {
    pub fn new(state: SelectionState, year_bounds: YearRange) -> Self {
        Self {
            state,
            year_bounds,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn year_bounds(&self) -> YearRange {
        self.year_bounds
    }

    pub fn subscribe(&mut self, listener: Rc<RefCell<dyn SelectionListener>>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn set_game_type(&mut self, game_type: GameType) -> Result<(), SelectionError> {
        self.state.game_type = game_type;
        self.notify(SelectionChange::GameType);
        Ok(())
    }

    pub fn set_genres(&mut self, genres: BTreeSet<SharedStr>) -> Result<(), SelectionError> {
        if genres.is_empty() {
            return Err(reject("select at least one genre"));
        }
        if genres.iter().any(|g| g.trim().is_empty()) {
            return Err(reject("genre tags must not be blank"));
        }
        self.state.required_genres = genres;
        self.notify(SelectionChange::Genres);
        Ok(())
    }

    /// Checkbox adapter: add the genre if absent, remove it if present.
    pub fn toggle_genre(&mut self, genre: &str) -> Result<(), SelectionError> {
        let mut genres = self.state.required_genres.clone();
        if !genres.remove(genre) {
            genres.insert(SharedStr::from(genre));
        }
        self.set_genres(genres)
    }

    pub fn set_compare_mode(&mut self, enabled: bool) -> Result<(), SelectionError> {
        self.state.compare_mode = enabled;
        self.notify(SelectionChange::CompareMode);
        Ok(())
    }

    pub fn set_year_range(&mut self, range: YearRange) -> Result<(), SelectionError> {
        if !range.is_finite() {
            return Err(reject("year range must be finite"));
        }
        if range.start > range.end {
            return Err(reject(format!(
                "year range start {} is after end {}",
                range.start, range.end
            )));
        }
        if !self.year_bounds.covers(&range, YEAR_TOLERANCE) {
            return Err(reject(format!(
                "year range {range} is outside the dataset's {}",
                self.year_bounds
            )));
        }
        self.state.year_range = range.clamp_to(&self.year_bounds);
        self.notify(SelectionChange::YearRange);
        Ok(())
    }

    /// Brush cleared: back to the full dataset extent.
    pub fn clear_year_range(&mut self) -> Result<(), SelectionError> {
        self.state.year_range = self.year_bounds;
        self.notify(SelectionChange::YearRange);
        Ok(())
    }

    /// Record the interval the views actually filtered by after a rescale
    /// moved it. Listeners are not notified; they produced the value.
    pub fn sync_year_range(&mut self, range: YearRange) {
        let range = range.clamp_to(&self.year_bounds);
        if range != self.state.year_range {
            debug!(from = %self.state.year_range, to = %range, "year range follows the brush");
            self.state.year_range = range;
        }
    }

    pub fn set_radius_extent(&mut self, extent: RadiusExtent) -> Result<(), SelectionError> {
        if !extent.is_valid() {
            return Err(reject(format!(
                "radius extent [{}, {}] must satisfy 0 <= min <= max",
                extent.min, extent.max
            )));
        }
        self.state.radius_extent = extent;
        self.notify(SelectionChange::RadiusExtent);
        Ok(())
    }

    /// Single-slider adapter: move the minimum radius, keep the maximum.
    pub fn set_min_radius(&mut self, min: f64) -> Result<(), SelectionError> {
        let max = self.state.radius_extent.max;
        self.set_radius_extent(RadiusExtent { min, max })
    }

    fn notify(&mut self, change: SelectionChange) {
        info!(?change, listeners = self.listeners.len(), "selection changed");
        for (id, listener) in &self.listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.selection_changed(&self.state, change),
                Err(_) => warn!(?id, "listener busy, skipping re-entrant notification"),
            }
        }
    }
}

fn reject(reason: impl Into<String>) -> SelectionError {
    let err = SelectionError::invalid(reason);
    debug!(%err, "selection change rejected");
    err
}
