use crate::api::CatalogApi;
use crate::app::Explorer;
use common::model::VenueKind;
use common::{Error, Result};

pub const HELP: &str = "\
Commands:
  search [TEXT]              filter cities (or places of the open city)
  open ID                    open a city from the list, or a place in a city
  back                       go up one level (cancels an edit)
  add                        add a new city
  edit                       edit the open city
  restaurants | hotels       edit the nearby list of the open place
  name TEXT | radius TEXT    set city fields while editing a city
  place add                  append a place entry
  place rm N                 remove place entry N
  place N name TEXT          set the name of place entry N
  place N desc TEXT          set the description of place entry N
  item add TEXT              append a restaurant/hotel
  item rm N                  remove entry N
  item N TEXT                rename entry N
  save | cancel              submit or abandon the current edit
  reload                     fetch the catalog again
  help | quit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Search(String),
    Open(i64),
    Back,
    Add,
    Edit,
    EditVenues(VenueKind),
    SetName(String),
    SetRadius(String),
    AddPlace,
    RemovePlace(usize),
    SetPlaceName(usize, String),
    SetPlaceDescription(usize, String),
    AddItem(String),
    RemoveItem(usize),
    SetItem(usize, String),
    Save,
    Cancel,
    Reload,
    Help,
    Quit,
}

fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

/// 1-based entry number to a vector index.
fn position(text: &str) -> Result<usize> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(Error::InvalidInput(format!("Expected an entry number, got '{}'", text))),
    }
}

fn required(text: &str, what: &str) -> Result<String> {
    if text.is_empty() {
        Err(Error::InvalidInput(format!("Missing {}", what)))
    } else {
        Ok(text.to_string())
    }
}

pub fn parse(line: &str) -> Result<Input> {
    let (command, rest) = split_word(line);
    let input = match command.to_lowercase().as_str() {
        "search" | "s" => Input::Search(rest.to_string()),
        "open" | "o" => Input::Open(
            rest.parse()
                .map_err(|_| Error::InvalidInput(format!("Expected an id, got '{}'", rest)))?,
        ),
        "back" | "b" => Input::Back,
        "add" => Input::Add,
        "edit" => Input::Edit,
        "restaurants" => Input::EditVenues(VenueKind::Restaurants),
        "hotels" => Input::EditVenues(VenueKind::Hotels),
        "name" => Input::SetName(rest.to_string()),
        "radius" => Input::SetRadius(rest.to_string()),
        "place" => parse_place(rest)?,
        "item" => parse_item(rest)?,
        "save" => Input::Save,
        "cancel" => Input::Cancel,
        "reload" => Input::Reload,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(Error::InvalidInput(format!("Unknown command '{}'", other))),
    };
    Ok(input)
}

fn parse_place(rest: &str) -> Result<Input> {
    let (first, tail) = split_word(rest);
    match first {
        "add" => Ok(Input::AddPlace),
        "rm" => Ok(Input::RemovePlace(position(tail)?)),
        _ => {
            let index = position(first)?;
            let (field, text) = split_word(tail);
            match field {
                "name" => Ok(Input::SetPlaceName(index, text.to_string())),
                "desc" | "description" => Ok(Input::SetPlaceDescription(index, text.to_string())),
                _ => Err(Error::InvalidInput(format!("Unknown place field '{}'", field))),
            }
        }
    }
}

fn parse_item(rest: &str) -> Result<Input> {
    let (first, tail) = split_word(rest);
    match first {
        "add" => Ok(Input::AddItem(required(tail, "name")?)),
        "rm" => Ok(Input::RemoveItem(position(tail)?)),
        _ => Ok(Input::SetItem(position(first)?, required(tail, "name")?)),
    }
}

/// What the caller should do after an input has been applied.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Render,
    Help,
    Quit,
}

fn not_here() -> Error {
    Error::InvalidInput("Not available here".to_string())
}

fn check(done: bool) -> Result<()> {
    if done { Ok(()) } else { Err(not_here()) }
}

/// Applies one input to the explorer.
///
/// `Err` is for inputs that make no sense in the current view; failed saves
/// are reported through the explorer's own inline error.
pub async fn apply<A: CatalogApi>(explorer: &mut Explorer<A>, input: Input) -> Result<Step> {
    match input {
        Input::Search(query) => explorer.set_query(&query),
        Input::Open(id) => {
            let opened = if explorer.selected_city().is_none() {
                explorer.open_city(id)
            } else {
                explorer.open_place(id)
            };
            if !opened {
                return Err(Error::InvalidInput(format!("Nothing to open with id {}", id)));
            }
        }
        Input::Back => explorer.back(),
        Input::Add => check(explorer.start_add())?,
        Input::Edit => check(explorer.start_edit())?,
        Input::EditVenues(kind) => check(explorer.start_venue_edit(kind))?,
        Input::SetName(name) => explorer.form_mut().ok_or_else(not_here)?.name = name,
        Input::SetRadius(radius) => explorer.form_mut().ok_or_else(not_here)?.radius = radius,
        Input::AddPlace => {
            explorer.form_mut().ok_or_else(not_here)?.add_place();
        }
        Input::RemovePlace(index) => {
            check(explorer.form_mut().ok_or_else(not_here)?.remove_place(index))?
        }
        Input::SetPlaceName(index, name) => {
            check(explorer.form_mut().ok_or_else(not_here)?.set_place_name(index, &name))?
        }
        Input::SetPlaceDescription(index, text) => check(
            explorer
                .form_mut()
                .ok_or_else(not_here)?
                .set_place_description(index, &text),
        )?,
        Input::AddItem(name) => explorer.venues_mut().ok_or_else(not_here)?.push(name),
        Input::RemoveItem(index) => {
            let items = explorer.venues_mut().ok_or_else(not_here)?;
            check(index < items.len())?;
            items.remove(index);
        }
        Input::SetItem(index, name) => {
            let items = explorer.venues_mut().ok_or_else(not_here)?;
            *items.get_mut(index).ok_or_else(not_here)? = name;
        }
        Input::Save => {
            check(explorer.is_editing())?;
            explorer.save().await;
        }
        Input::Cancel => {
            check(explorer.is_editing())?;
            explorer.cancel();
        }
        Input::Reload => explorer.load().await,
        Input::Help => return Ok(Step::Help),
        Input::Quit => return Ok(Step::Quit),
    }
    Ok(Step::Render)
}
