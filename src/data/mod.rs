//! Core data models for the Pokedex shell
//!
//! This module contains the PokeAPI response shapes decoded by the shell, plus
//! the fetch capability and the cached fetch-through built on it.

pub mod fetch;
pub mod resource;

pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use resource::{fetch_resource, DecodeError, ResourceError};

use serde::{Deserialize, Deserializer, Serialize};

/// Default PokeAPI root, without a trailing slash
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// A `{name, url}` pair as PokeAPI uses for references to other resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the `location-area` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u32,
    /// URL of the following page; `None` on the last page
    pub next: Option<String>,
    /// URL of the preceding page; `None` on the first page
    pub previous: Option<String>,
    /// Areas on this page, in service order
    pub results: Vec<NamedResource>,
}

/// A single location area with the pokemon that can be found there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationArea {
    #[serde(default)]
    pub name: String,
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

/// One entry of a location area's encounter list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// Pokemon detail resource
///
/// Only the attributes the shell displays are decoded; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating this pokemon, drives the catch chance
    ///
    /// Some forms report `null`; those decode as 0.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub base_experience: u32,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: StatName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatName {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonType {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: TypeName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub name: String,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builds resource URLs relative to a PokeAPI root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    /// Creates endpoints for the given root; a trailing slash is ignored
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// URL of the first location-area page
    pub fn first_location_page(&self) -> String {
        format!("{}/location-area/", self.base_url)
    }

    /// URL of a single location area
    pub fn location_area(&self, area: &str) -> String {
        format!("{}/location-area/{}", self.base_url, area)
    }

    /// URL of a pokemon detail resource
    pub fn pokemon(&self, name: &str) -> String {
        format!("{}/pokemon/{}", self.base_url, name)
    }
}
