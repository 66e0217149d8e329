//! Shell command table

/// Commands understood by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Fight,
    History,
    Cache,
}

impl Command {
    /// Every command, in the order `help` lists them.
    pub const ALL: [Command; 11] = [
        Command::Help,
        Command::Map,
        Command::MapBack,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
        Command::Fight,
        Command::History,
        Command::Cache,
        Command::Exit,
    ];

    pub fn parse(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == word)
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::MapBack => "mapb",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
            Command::Fight => "fight",
            Command::History => "history",
            Command::Cache => "cache",
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Command::Explore => "explore <area>",
            Command::Catch => "catch <name>",
            Command::Inspect => "inspect <name>",
            Command::Fight => "fight <a> <b>",
            other => other.name(),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Displays this help screen",
            Command::Exit => "Exit the Pokedex",
            Command::Map => "Displays the next page of locations",
            Command::MapBack => "Displays the previous page of locations",
            Command::Explore => "Lists the pokemon found in an area",
            Command::Catch => "Attempts to catch a pokemon",
            Command::Inspect => "Displays stats for a caught pokemon",
            Command::Pokedex => "Lists your caught pokemon",
            Command::Fight => "Pits two caught pokemon against each other",
            Command::History => "Lists the commands entered this session",
            Command::Cache => "Displays response cache statistics",
        }
    }
}

/// Lower-cases the line and splits it into words.
pub fn clean_input(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input() {
        assert_eq!(clean_input(" hello world "), vec!["hello", "world"]);
        assert_eq!(clean_input("Hello   World "), vec!["hello", "world"]);
        assert_eq!(clean_input("hi"), vec!["hi"]);
        assert!(clean_input("   ").is_empty());
    }

    #[test]
    fn test_parse_round_trips_names() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.name()), Some(command));
        }
        assert_eq!(Command::parse("fly"), None);
    }

    #[test]
    fn test_usage_includes_arguments() {
        assert_eq!(Command::Explore.usage(), "explore <area>");
        assert_eq!(Command::MapBack.usage(), "mapb");
        assert_eq!(Command::Fight.usage(), "fight <a> <b>");
    }
}
