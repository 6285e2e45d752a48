//! In-memory application state with change notifications.
//!
//! Every user action goes through [`Session`], which mutates the
//! [`AppState`] and tells subscribers what changed so views can re-render.

use crate::{model::UnitSystem, state::AppState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    CurrentCity(String),
    Units(UnitSystem),
    History,
    Favourites,
}

type Subscriber = Box<dyn FnMut(&StateChange)>;

pub struct Session {
    state: AppState,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Session {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&StateChange) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Make `city` the current city and move it to the front of the history.
    /// Used for search results as well as history and favourite picks.
    pub fn open_city(&mut self, city: &str) {
        if self.state.current_city != city {
            self.state.set_current_city(city);
            self.notify(StateChange::CurrentCity(city.to_string()));
        }

        if self.state.history.latest() != Some(city) {
            self.state.add_to_history(city);
            self.notify(StateChange::History);
        }
    }

    /// Add or remove the current city from favourites; returns whether it is
    /// now a favourite.
    pub fn toggle_favourite(&mut self) -> bool {
        let city = self.state.current_city.clone();
        let now_favourite = if self.state.is_favourite(&city) {
            self.state.remove_favourite(&city);
            false
        } else {
            self.state.add_favourite(&city);
            true
        };

        self.notify(StateChange::Favourites);
        now_favourite
    }

    pub fn add_favourite(&mut self, city: &str) {
        if self.state.favourites.latest() != Some(city) {
            self.state.add_favourite(city);
            self.notify(StateChange::Favourites);
        }
    }

    pub fn remove_favourite(&mut self, city: &str) -> bool {
        let removed = self.state.remove_favourite(city);
        if removed {
            self.notify(StateChange::Favourites);
        }
        removed
    }

    pub fn remove_from_history(&mut self, city: &str) -> bool {
        let removed = self.state.remove_from_history(city);
        if removed {
            self.notify(StateChange::History);
        }
        removed
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        if self.state.units != units {
            self.state.set_units(units);
            self.notify(StateChange::Units(units));
        }
    }

    fn notify(&mut self, change: StateChange) {
        tracing::debug!(?change, "State changed");
        for subscriber in &mut self.subscribers {
            subscriber(&change);
        }
    }
}
