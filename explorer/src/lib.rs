pub mod api;
pub mod app;
pub mod form;
pub mod render;
pub mod session;


use std::io::Write;
use api::HttpCatalog;
use app::Explorer;
use common::config::Settings;
use common::{Error, Result};
use session::Step;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Where the explorer should point and what it should show first.
pub struct Target {
    pub config_path: String,
    pub base_url: Option<String>,
}

impl Target {
    async fn explorer(&self) -> Result<Explorer<HttpCatalog>> {
        let settings = Settings::new(&self.config_path)?;
        let base_url = self
            .base_url
            .clone()
            .unwrap_or(settings.explorer.base_url);
        info!("Using store at {}", base_url);

        let mut explorer = Explorer::new(HttpCatalog::new(&base_url)?);
        explorer.load().await;
        Ok(explorer)
    }
}

/// Interactive drill-down session over stdin.
pub async fn run_browse(target: &Target) -> Result<()> {
    let mut explorer = target.explorer().await?;
    println!("{}", render::render(&explorer));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let input = match session::parse(&line) {
            Ok(input) => input,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(?input, "Applying input");

        match session::apply(&mut explorer, input).await {
            Ok(Step::Render) => println!("{}", render::render(&explorer)),
            Ok(Step::Help) => println!("{}", session::HELP),
            Ok(Step::Quit) => break,
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}

/// Prints the city list, optionally filtered.
pub async fn run_list(target: &Target, query: Option<&str>) -> Result<()> {
    let mut explorer = target.explorer().await?;
    explorer.set_query(query.unwrap_or_default());
    print!("{}", render::render(&explorer));
    surfaced(&explorer)
}

/// Prints one city's places, optionally filtered.
pub async fn run_show(target: &Target, city_id: i64, query: Option<&str>) -> Result<()> {
    let mut explorer = target.explorer().await?;
    surfaced(&explorer)?;
    if !explorer.open_city(city_id) {
        return Err(Error::NotFound(city_id.to_string()));
    }
    explorer.set_query(query.unwrap_or_default());
    print!("{}", render::render(&explorer));
    Ok(())
}

/// Adds a city in one go; places are `(name, description)` pairs.
pub async fn run_add(
    target: &Target,
    name: &str,
    radius: &str,
    places: &[(String, String)],
) -> Result<()> {
    let mut explorer = target.explorer().await?;
    surfaced(&explorer)?;
    explorer.start_add();

    if let Some(form) = explorer.form_mut() {
        form.name = name.to_string();
        form.radius = radius.to_string();
        form.places.clear();
        for (place_name, description) in places {
            form.add_place();
            let index = form.places.len() - 1;
            form.set_place_name(index, place_name);
            form.set_place_description(index, description);
        }
    }

    if explorer.save().await {
        if let Some(city) = explorer.cities().last() {
            println!("Added city #{} {}", city.id, city.name());
        }
        Ok(())
    } else {
        surfaced(&explorer)
    }
}

fn surfaced<A: api::CatalogApi>(explorer: &Explorer<A>) -> Result<()> {
    match explorer.error() {
        Some(message) => Err(Error::Other(message.to_string())),
        None => Ok(()),
    }
}
