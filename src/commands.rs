//! Command parsing and dispatch for the Pokedex shell
//!
//! A line is parsed once into a `Command`, then executed against the session,
//! the response cache and the fetch capability. Handlers write their output to
//! a caller-supplied sink so they can run against a buffer in tests.

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::cache::ExpiringCache;
use crate::catch::{attempt_catch, CatchOutcome, Roll};
use crate::data::{
    fetch_resource, Endpoints, Fetch, LocationArea, LocationAreaPage, Pokemon, ResourceError,
};
use crate::session::SessionState;

/// Errors surfaced to the user by a command
///
/// None of these end the session; the shell prints them and reads the next line.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The first word is not a known command
    #[error("Unknown command: '{0}'. Type 'help' to list commands")]
    UnknownCommand(String),

    /// Wrong number of arguments for a known command
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// `mapb` before any page with a previous link was shown
    #[error("You're on the first page")]
    NoPreviousPage,

    /// `map` after the last page was shown
    #[error("You're on the last page")]
    NoNextPage,

    /// `inspect` of a pokemon that was never caught
    #[error("You have not caught {0}")]
    NotFound(String),

    /// Fetching or decoding a resource failed
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Writing to the output sink failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Registry entry describing one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Trigger word
    pub name: &'static str,
    /// Usage line shown in help and usage errors
    pub usage: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Exact number of arguments accepted
    pub arity: usize,
}

/// All commands, in the order `help` lists them
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        name: "help",
        usage: "help",
        description: "Displays a help message",
        arity: 0,
    },
    CommandInfo {
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
        arity: 0,
    },
    CommandInfo {
        name: "map",
        usage: "map",
        description: "Displays the next 20 location areas",
        arity: 0,
    },
    CommandInfo {
        name: "mapb",
        usage: "mapb",
        description: "Displays the previous 20 location areas",
        arity: 0,
    },
    CommandInfo {
        name: "explore",
        usage: "explore <location-area>",
        description: "Lists the pokemon found in a location area",
        arity: 1,
    },
    CommandInfo {
        name: "catch",
        usage: "catch <pokemon>",
        description: "Attempts to catch a pokemon",
        arity: 1,
    },
    CommandInfo {
        name: "inspect",
        usage: "inspect <pokemon>",
        description: "Shows details of a caught pokemon",
        arity: 1,
    },
    CommandInfo {
        name: "pokedex",
        usage: "pokedex",
        description: "Lists all caught pokemon",
        arity: 0,
    },
];

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(String),
    Catch(String),
    Inspect(String),
    Pokedex,
}

impl Command {
    /// Parses a line into a command
    ///
    /// The line is lower-cased and split on whitespace. The first word must name
    /// a command exactly and the remaining words must match its arity, so `map`
    /// and `mapb` never shadow each other and `catch` without a name is a usage
    /// error rather than a lookup of an empty name.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim().to_lowercase();
        let mut words = line.split_whitespace();
        let word = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let info = COMMANDS
            .iter()
            .find(|info| info.name == word)
            .ok_or_else(|| CommandError::UnknownCommand(word.to_string()))?;

        if args.len() != info.arity {
            return Err(CommandError::Usage(info.usage));
        }

        let command = match info.name {
            "help" => Command::Help,
            "exit" => Command::Exit,
            "map" => Command::Map,
            "mapb" => Command::MapBack,
            "explore" => Command::Explore(args[0].to_string()),
            "catch" => Command::Catch(args[0].to_string()),
            "inspect" => Command::Inspect(args[0].to_string()),
            "pokedex" => Command::Pokedex,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };

        Ok(command)
    }
}

/// What the shell should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Runs commands against one session
///
/// Commands execute strictly one at a time; the dispatcher owns the session
/// state outright and shares only the cache with the reaper.
pub struct Dispatcher {
    session: SessionState,
    cache: ExpiringCache,
    fetcher: Arc<dyn Fetch>,
    roll: Box<dyn Roll + Send>,
    endpoints: Endpoints,
}

impl Dispatcher {
    /// Creates a dispatcher with a fresh session paging from the first location page
    pub fn new(
        endpoints: Endpoints,
        cache: ExpiringCache,
        fetcher: Arc<dyn Fetch>,
        roll: Box<dyn Roll + Send>,
    ) -> Self {
        Self {
            session: SessionState::new(endpoints.first_location_page()),
            cache,
            fetcher,
            roll,
            endpoints,
        }
    }

    /// Current session state
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Response cache used by this dispatcher
    pub fn cache(&self) -> &ExpiringCache {
        &self.cache
    }

    /// Parses and executes one input line
    pub async fn execute_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<ControlFlow, CommandError> {
        let command = Command::parse(line)?;
        self.execute(command, out).await
    }

    /// Executes a parsed command
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> Result<ControlFlow, CommandError> {
        debug!(?command, "dispatch");

        match command {
            Command::Help => write_help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(ControlFlow::Exit);
            }
            Command::Map => self.map_forward(out).await?,
            Command::MapBack => self.map_back(out).await?,
            Command::Explore(area) => self.explore(&area, out).await?,
            Command::Catch(name) => self.catch(&name, out).await?,
            Command::Inspect(name) => self.inspect(&name, out)?,
            Command::Pokedex => self.pokedex(out)?,
        }

        Ok(ControlFlow::Continue)
    }

    async fn map_forward<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let url = self
            .session
            .cursor
            .next
            .clone()
            .ok_or(CommandError::NoNextPage)?;
        self.show_page(&url, out).await
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        let url = self
            .session
            .cursor
            .previous
            .clone()
            .ok_or(CommandError::NoPreviousPage)?;
        self.show_page(&url, out).await
    }

    /// Fetches a listing page, moves the cursor to it and prints its areas
    async fn show_page<W: Write>(&mut self, url: &str, out: &mut W) -> Result<(), CommandError> {
        let page: LocationAreaPage =
            fetch_resource(&self.cache, self.fetcher.as_ref(), url, url).await?;

        self.session.cursor.apply(&page);
        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "Exploring {}...", area)?;
        let url = self.endpoints.location_area(area);
        let location: LocationArea =
            fetch_resource(&self.cache, self.fetcher.as_ref(), &url, &url).await?;

        writeln!(out, "Found Pokemon:")?;
        for encounter in &location.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "Throwing a Pokeball at {}...", name)?;
        let url = self.endpoints.pokemon(name);
        let pokemon: Pokemon =
            fetch_resource(&self.cache, self.fetcher.as_ref(), &url, &url).await?;

        match attempt_catch(pokemon, self.roll.as_mut()) {
            CatchOutcome::Caught(caught) => {
                self.session.record_catch(name, caught);
                writeln!(out, "{} was caught!", name)?;
                writeln!(out, "You may now inspect it with the inspect command.")?;
            }
            CatchOutcome::Escaped { .. } => {
                writeln!(out, "{} escaped!", name)?;
            }
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<(), CommandError> {
        let caught = self
            .session
            .caught(name)
            .ok_or_else(|| CommandError::NotFound(name.to_string()))?;
        let pokemon = &caught.pokemon;

        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  - {}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        Ok(())
    }

    fn pokedex<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        let names = self.session.caught_names();
        if names.is_empty() {
            writeln!(out, "Your Pokedex is empty. Try the catch command.")?;
            return Ok(());
        }

        writeln!(out, "Your Pokedex:")?;
        for name in names {
            writeln!(out, " - {}", name)?;
        }
        Ok(())
    }
}

/// Prints the welcome banner and the command table
pub fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "Welcome to the Pokedex!")?;
    writeln!(out, "Usage:")?;
    writeln!(out)?;
    for info in COMMANDS {
        writeln!(out, "{}: {}", info.usage, info.description)?;
    }
    Ok(())
}
