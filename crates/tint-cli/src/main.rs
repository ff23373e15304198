use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tint_cli::{add_alias, apply_once, list_aliases, remove_alias, resolve_cookies, suggest_alias};
use tint_core::TintConfig;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let store = Arg::new("store")
        .long("store")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file holding the alias colors");
    let cookies = Arg::new("cookies")
        .long("cookies")
        .default_value("")
        .help("Cookie text as the page sees it, e.g. 'a=1; aws-userInfo=...'");
    let json = Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON");

    Command::new("tint")
        .version(tint_core::VERSION)
        .about("Color the console navigation bar by signed-in account alias")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Show the identity carried by a cookie string")
                .arg(cookies.clone())
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("apply")
                .about("Run one reconciliation pass against a headless navigation bar")
                .arg(cookies.clone())
                .arg(store.clone())
                .arg(
                    Arg::new("baseline")
                        .long("baseline")
                        .default_value("rgb(35, 47, 62)")
                        .help("Computed background of the bar"),
                )
                .arg(
                    Arg::new("current")
                        .long("current")
                        .help("Inline background already set on the bar"),
                )
                .arg(json.clone()),
        )
        .subcommand(
            Command::new("suggest")
                .about("Alias the settings editor would pre-fill for a tab")
                .arg(Arg::new("url").long("url").required(true).help("Tab URL"))
                .arg(cookies),
        )
        .subcommand(
            Command::new("aliases")
                .about("Manage configured alias colors")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List aliases sorted by name")
                        .arg(store.clone())
                        .arg(json),
                )
                .subcommand(
                    Command::new("add")
                        .about("Add or update an alias")
                        .arg(Arg::new("alias").required(true))
                        .arg(Arg::new("color").required(true))
                        .arg(store.clone()),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Delete an alias")
                        .arg(Arg::new("alias").required(true))
                        .arg(store),
                ),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<TintConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Ok(TintConfig::load(path)?),
        None => Ok(TintConfig::default()),
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.get_one::<String>(name).map_or("", String::as_str)
}

fn store_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("store")
        .cloned()
        .unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("resolve", args)) => {
            let report = resolve_cookies(&config.credentials, arg(args, "cookies"));
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Some(("apply", args)) => {
            let report = apply_once(
                &config,
                &store_path(args),
                arg(args, "cookies"),
                arg(args, "baseline"),
                args.get_one::<String>("current").cloned(),
            )
            .await;
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Some(("suggest", args)) => {
            match suggest_alias(&config, arg(args, "url"), arg(args, "cookies")) {
                Some(alias) => println!("{alias}"),
                None => std::process::exit(1),
            }
        }
        Some(("aliases", args)) => match args.subcommand() {
            Some(("list", args)) => {
                let entries = list_aliases(&config, &store_path(args)).await?;
                if args.get_flag("json") {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else if entries.is_empty() {
                    println!("No aliases configured yet.");
                } else {
                    for entry in entries {
                        println!("{}\t{}", entry.alias, entry.color);
                    }
                }
            }
            Some(("add", args)) => {
                let entries =
                    add_alias(&config, &store_path(args), arg(args, "alias"), arg(args, "color"))
                        .await?;
                println!("{} alias(es) configured", entries.len());
            }
            Some(("remove", args)) => {
                let alias = arg(args, "alias");
                if remove_alias(&config, &store_path(args), alias).await? {
                    println!("Deleted {alias}");
                } else {
                    println!("No alias named {alias}");
                }
            }
            _ => unreachable!("subcommand required"),
        },
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}
