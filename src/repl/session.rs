//! Shell session state and command dispatch.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::api::CatalogClient;
use crate::collection::CollectionStore;
use crate::error::{Error, Result};
use crate::models::{Creature, LocationPage};
use crate::repl::catch::is_caught;
use crate::repl::commands::{clean_input, Command};
use crate::repl::fight::{self, MAX_ROUNDS};

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Per-user shell state: pagination cursor, caught creatures, history.
pub struct Session {
    client: CatalogClient,
    /// URL of the next location page, once a page has been shown
    next: Option<String>,
    /// URL of the previous location page, once a page has been shown
    previous: Option<String>,
    /// Whether any location page has been shown yet
    paging: bool,
    /// Caught creatures, mirrored in `store`
    pokedex: BTreeMap<String, Creature>,
    store: Arc<dyn CollectionStore>,
    history: Vec<String>,
    rng: StdRng,
}

impl Session {
    pub fn new(client: CatalogClient, store: Arc<dyn CollectionStore>) -> Self {
        Self::with_rng(client, store, StdRng::from_entropy())
    }

    /// Creates a session whose catch and fight rolls come from `rng`.
    pub fn with_rng(client: CatalogClient, store: Arc<dyn CollectionStore>, rng: StdRng) -> Self {
        Self {
            client,
            next: None,
            previous: None,
            paging: false,
            pokedex: BTreeMap::new(),
            store,
            history: Vec::new(),
            rng,
        }
    }

    /// Loads previously caught creatures from the collection store.
    pub async fn load_collection(&mut self) -> Result<usize> {
        let caught = self.store.list().await?;
        let count = caught.len();
        self.pokedex.extend(caught);
        info!(count, "Collection loaded");
        Ok(count)
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn pokedex(&self) -> &BTreeMap<String, Creature> {
        &self.pokedex
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    // == Execute ==
    /// Runs one input line, writing user-facing text to `out`.
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let words = clean_input(line);
        let Some(first) = words.first() else {
            writeln!(out, "Please enter a command. Type help for assistance.")?;
            return Ok(Flow::Continue);
        };

        let Some(command) = Command::parse(first) else {
            writeln!(out, "Unknown command, type help for assistance.")?;
            return Ok(Flow::Continue);
        };

        self.history.push(command.name().to_string());
        let args = &words[1..];

        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Exiting Pokedex...")?;
                return Ok(Flow::Exit);
            }
            Command::Map => self.map(out).await?,
            Command::MapBack => self.map_back(out).await?,
            Command::Explore => self.explore(required_arg(command, args)?, out).await?,
            Command::Catch => self.catch(required_arg(command, args)?, out).await?,
            Command::Inspect => self.inspect(required_arg(command, args)?, out)?,
            Command::Pokedex => self.list_pokedex(out)?,
            Command::Fight => {
                let (first, second) = two_args(command, args)?;
                self.fight(first, second, out).await?
            }
            Command::History => self.list_history(out)?,
            Command::Cache => self.cache_stats(out)?,
        }

        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        for command in Command::ALL {
            writeln!(out, "  {:<16} {}", command.usage(), command.description())?;
        }
        Ok(())
    }

    // == Pagination ==
    async fn map<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let url = if self.paging {
            match self.next.clone() {
                Some(url) => url,
                None => {
                    writeln!(out, "You're on the last page.")?;
                    return Ok(());
                }
            }
        } else {
            self.client.first_location_page_url()
        };

        let page = self.client.location_page(&url).await?;
        self.show_page(page, out)
    }

    async fn map_back<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let url = self
            .previous
            .clone()
            .unwrap_or_else(|| self.client.first_location_page_url());

        let page = self.client.location_page(&url).await?;
        self.show_page(page, out)
    }

    fn show_page<W: Write>(&mut self, page: LocationPage, out: &mut W) -> Result<()> {
        self.paging = true;
        self.next = page.next;
        self.previous = page.previous;

        for location in &page.results {
            writeln!(out, "{}", location.name)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&mut self, area: &str, out: &mut W) -> Result<()> {
        writeln!(out, "Exploring {}...", area)?;
        let location = self.client.location_area(area).await?;

        writeln!(out, "Found Pokemon:")?;
        for name in location.creature_names() {
            writeln!(out, " - {}", name)?;
        }
        Ok(())
    }

    // == Collection ==
    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
        if self.pokedex.contains_key(name) || self.store.contains(name).await? {
            return Err(Error::InvalidArgument(format!("already caught {}", name)));
        }

        writeln!(out, "Throwing a Pokeball at {}...", name)?;
        let creature = self.client.creature(name).await?;

        let roll: f64 = self.rng.gen();
        if is_caught(creature.base_experience, roll) {
            self.store.add(name, &creature).await?;
            info!(creature = %name, "caught");
            writeln!(out, "{} was caught!", name)?;
            writeln!(out, "You may now inspect it with the inspect command.")?;
            self.pokedex.insert(name.to_string(), creature);
        } else {
            writeln!(out, "{} escaped!", name)?;
        }
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let Some(creature) = self.pokedex.get(name) else {
            writeln!(out, "you have not caught that pokemon")?;
            return Ok(());
        };

        writeln!(out, "Name: {}", creature.name)?;
        writeln!(out, "Height: {}", creature.height)?;
        writeln!(out, "Weight: {}", creature.weight)?;
        writeln!(out, "Stats:")?;
        for stat in &creature.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for entry in &creature.types {
            writeln!(out, "  - {}", entry.kind.name)?;
        }
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "Your Pokedex:")?;
        if self.pokedex.is_empty() {
            writeln!(out, "You have not caught any pokemon yet.")?;
        }
        for name in self.pokedex.keys() {
            writeln!(out, " - {}", name)?;
        }
        Ok(())
    }

    // == Fight ==
    async fn fight<W: Write>(&mut self, first: &str, second: &str, out: &mut W) -> Result<()> {
        if first == second {
            return Err(Error::InvalidArgument(format!("{} cannot fight itself", first)));
        }
        let first_exp = self.caught_experience(first)?;
        let second_exp = self.caught_experience(second)?;

        for round in 1..=MAX_ROUNDS {
            let first_rolls = fight::roll(&mut self.rng, first_exp);
            let second_rolls = fight::roll(&mut self.rng, second_exp);
            write_rolls(out, first, &first_rolls)?;
            write_rolls(out, second, &second_rolls)?;

            let (winner, loser) = if first_rolls.total > second_rolls.total {
                (first, second)
            } else if second_rolls.total > first_rolls.total {
                (second, first)
            } else {
                if round < MAX_ROUNDS {
                    writeln!(out, "It's a tie! Rolling again...")?;
                }
                continue;
            };

            self.store.remove(loser).await?;
            self.pokedex.remove(loser);
            info!(winner = %winner, loser = %loser, "fight finished");
            writeln!(out, "{} wins! {} is removed from your pokedex.", winner, loser)?;
            return Ok(());
        }

        writeln!(out, "Still tied after {} rounds, nobody leaves.", MAX_ROUNDS)?;
        Ok(())
    }

    fn caught_experience(&self, name: &str) -> Result<u32> {
        self.pokedex
            .get(name)
            .map(|creature| creature.base_experience)
            .ok_or_else(|| {
                Error::InvalidArgument(format!("{} is not one of your caught pokemon", name))
            })
    }

    fn list_history<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "History:")?;
        for command in &self.history {
            writeln!(out, "-{}", command)?;
        }
        Ok(())
    }

    fn cache_stats<W: Write>(&self, out: &mut W) -> Result<()> {
        let cache = self.client.reader().cache();
        let stats = cache.stats();

        writeln!(out, "Cache (ttl {:?}):", cache.ttl())?;
        writeln!(out, "  entries:     {}", stats.total_entries)?;
        writeln!(out, "  hits:        {}", stats.hits)?;
        writeln!(out, "  misses:      {}", stats.misses)?;
        writeln!(out, "  hit rate:    {:.2}", stats.hit_rate())?;
        writeln!(out, "  sweeps:      {}", stats.sweeps)?;
        writeln!(out, "  expirations: {}", stats.expirations)?;
        Ok(())
    }
}

fn write_rolls<W: Write>(out: &mut W, name: &str, rolls: &fight::Rolls) -> Result<()> {
    write!(out, "{} rolls:", name)?;
    for value in &rolls.values {
        write!(out, " {}", value)?;
    }
    writeln!(out, " = {}", rolls.total)?;
    Ok(())
}

fn two_args(command: Command, args: &[String]) -> Result<(&str, &str)> {
    match args {
        [first, second, ..] => Ok((first.as_str(), second.as_str())),
        _ => Err(Error::InvalidArgument(format!("usage: {}", command.usage()))),
    }
}

fn required_arg(command: Command, args: &[String]) -> Result<&str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidArgument(format!("usage: {}", command.usage())))
}
