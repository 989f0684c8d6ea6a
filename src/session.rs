//! Session state for the Pokedex shell
//!
//! Holds the location-area pagination cursors and the pokedex of caught
//! pokemon. Lives for the whole process and is only touched by the command
//! loop, so it needs no locking.

use std::collections::HashMap;

use crate::catch::CaughtPokemon;
use crate::data::LocationAreaPage;

/// Pagination cursors over the location-area listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// URL the next `map` will request; `None` once the last page was shown
    pub next: Option<String>,
    /// URL the next `mapb` will request; `None` until the service returns one
    pub previous: Option<String>,
}

impl Cursor {
    /// Cursor positioned before the first page
    pub fn starting_at(first_page: impl Into<String>) -> Self {
        Self {
            next: Some(first_page.into()),
            previous: None,
        }
    }

    /// Moves the cursor to the links of a page that was just displayed
    pub fn apply(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
    }
}

/// Mutable per-process state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub cursor: Cursor,
    /// Caught pokemon keyed by the name used to catch them
    pub pokedex: HashMap<String, CaughtPokemon>,
}

impl SessionState {
    /// Creates a fresh session paging from `first_page`
    pub fn new(first_page: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::starting_at(first_page),
            pokedex: HashMap::new(),
        }
    }

    /// Stores a caught pokemon, replacing any earlier record under `name`
    pub fn record_catch(&mut self, name: impl Into<String>, caught: CaughtPokemon) {
        self.pokedex.insert(name.into(), caught);
    }

    /// Looks up a caught pokemon
    pub fn caught(&self, name: &str) -> Option<&CaughtPokemon> {
        self.pokedex.get(name)
    }

    /// Names of all caught pokemon, sorted
    pub fn caught_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pokedex.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
