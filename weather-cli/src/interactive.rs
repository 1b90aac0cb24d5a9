//! Line-oriented session: one orchestrator kept alive across actions so unit
//! changes replay the previous lookup.

use anyhow::{Context, Result};
use inquire::{InquireError, Text};
use weather_core::{FavoritesStore, KeyValueStore, Orchestrator, Units};

use crate::render;

const HELP: &str = "\
Type a city name to search, or one of:
  :here               weather at your current position
  :units <system>     switch to metric or imperial and refresh
  :suggest <text>     city name suggestions
  :fav                add the displayed city to favorites
  :unfav [city]       remove a favorite (default: displayed city)
  :favs               list favorites
  :help               show this help
  :quit               leave";

#[derive(Debug, PartialEq)]
enum Action<'a> {
    Search(&'a str),
    Here,
    Units(&'a str),
    Suggest(&'a str),
    AddFavorite,
    RemoveFavorite(Option<&'a str>),
    ListFavorites,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Action<'_> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Action::Search(line);
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "here" => Action::Here,
        "units" => Action::Units(arg),
        "suggest" => Action::Suggest(arg),
        "fav" => Action::AddFavorite,
        "unfav" => Action::RemoveFavorite(Some(arg).filter(|a| !a.is_empty())),
        "favs" => Action::ListFavorites,
        "help" => Action::Help,
        "quit" | "q" | "exit" => Action::Quit,
        _ => Action::Unknown(name),
    }
}

pub async fn run<S: KeyValueStore>(
    orch: &Orchestrator,
    mut favorites: FavoritesStore<S>,
) -> Result<()> {
    println!("{HELP}");

    loop {
        let prompt = format!("[{}] >", orch.units());
        let line = match Text::new(&prompt).prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match parse(&line) {
            Action::Search(city) => print!("{}", render::display(&orch.search(city).await)),
            Action::Here => print!("{}", render::display(&orch.use_current_location().await)),
            Action::Units(arg) => match arg.parse::<Units>() {
                Ok(units) => print!("{}", render::display(&orch.change_units(units).await)),
                Err(e) => println!("{e}"),
            },
            Action::Suggest(text) => {
                let suggestions = orch.suggestions(text).await;
                if suggestions.is_empty() {
                    println!("No suggestions.");
                }
                for s in suggestions {
                    println!("  {s}");
                }
            }
            Action::AddFavorite => match orch.displayed_location() {
                Some(city) => {
                    if favorites.add(&city)? {
                        println!("Added {city} to favorites.");
                    } else {
                        println!("{city} is already a favorite.");
                    }
                }
                None => println!("Search for a city first."),
            },
            Action::RemoveFavorite(city) => {
                match city.map(str::to_string).or_else(|| orch.displayed_location()) {
                    Some(city) => {
                        if favorites.remove(&city)? {
                            println!("Removed {city} from favorites.");
                        } else {
                            println!("{city} is not a favorite.");
                        }
                    }
                    None => println!("Name a city to remove."),
                }
            }
            Action::ListFavorites => {
                if favorites.list().is_empty() {
                    println!("No favorite cities yet.");
                }
                for city in favorites.list() {
                    println!("  {city}");
                }
            }
            Action::Help => println!("{HELP}"),
            Action::Quit => break,
            Action::Unknown(name) => println!("Unknown command ':{name}'. Type :help."),
        }
    }

    Ok(())
}
