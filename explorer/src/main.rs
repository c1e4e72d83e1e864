use clap::{Arg, ArgAction, ArgMatches, Command};
use explorer::Target;
use std::process;
use tracing_subscriber::{EnvFilter, fmt};


fn parse_place(arg: &str) -> anyhow::Result<(String, String)> {
    let (name, description) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("place '{}' must look like NAME=DESCRIPTION", arg))?;
    Ok((name.trim().to_string(), description.trim().to_string()))
}

async fn dispatch(target: &Target, matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("browse", _)) => explorer::run_browse(target).await?,
        Some(("list", list_matches)) => {
            let query = list_matches.get_one::<String>("query").map(|s| s.as_str());
            explorer::run_list(target, query).await?
        }
        Some(("show", show_matches)) => {
            let city_id = *show_matches
                .get_one::<i64>("city_id")
                .ok_or_else(|| anyhow::anyhow!("missing city id"))?;
            let query = show_matches.get_one::<String>("query").map(|s| s.as_str());
            explorer::run_show(target, city_id, query).await?
        }
        Some(("add", add_matches)) => {
            let name = add_matches.get_one::<String>("name").map(|s| s.as_str()).unwrap_or_default();
            let radius = add_matches.get_one::<String>("radius").map(|s| s.as_str()).unwrap_or_default();
            let places = add_matches
                .get_many::<String>("place")
                .map(|values| values.map(|v| parse_place(v)).collect::<anyhow::Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            explorer::run_add(target, name, radius, &places).await?
        }
        _ => anyhow::bail!("No subcommand specified. Use --help for usage information."),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let matches = Command::new("City Explorer")
        .version("1.0")
        .about("Browse, search, add and edit cities in the catalog store")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Sets a custom config file"),
        )
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Store address, overrides the config file"),
        )
        .subcommand(Command::new("browse").about("Interactive drill-down session"))
        .subcommand(
            Command::new("list")
                .about("List cities")
                .arg(Arg::new("query").help("Case-insensitive name filter")),
        )
        .subcommand(
            Command::new("show")
                .about("Show the places of one city")
                .arg(
                    Arg::new("city_id")
                        .required(true)
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(Arg::new("query").help("Filter on place name or description")),
        )
        .subcommand(
            Command::new("add")
                .about("Add a city")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("radius").long("radius").required(true))
                .arg(
                    Arg::new("place")
                        .long("place")
                        .value_name("NAME=DESCRIPTION")
                        .action(ArgAction::Append),
                ),
        )
        .get_matches();

    let target = Target {
        config_path: matches
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| "config/catalog.toml".to_string()),
        base_url: matches.get_one::<String>("base_url").cloned(),
    };

    if let Err(e) = dispatch(&target, &matches).await {
        eprintln!("Explorer error: {}", e);
        process::exit(1);
    }
}
