use std::{env, path::PathBuf, process};

use prefgraph::{EntityKind, PrefGraphError, PreferenceStore};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Config {
    database: String,
    command: String,
    ranker: Option<String>,
}

impl Config {
    fn from_args(args: &[&str]) -> Result<Self, String> {
        let mut database = String::from("memory");
        let mut command = String::from("status");
        let mut ranker = None;
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match *arg {
                "--db" | "--database" => {
                    database = iter
                        .next()
                        .ok_or_else(|| "--db requires a value".to_string())?
                        .to_string();
                }
                "--command" => {
                    command = iter
                        .next()
                        .ok_or_else(|| "--command requires a value".to_string())?
                        .to_string();
                }
                "--ranker" => {
                    ranker = Some(
                        iter.next()
                            .ok_or_else(|| "--ranker requires a value".to_string())?
                            .to_string(),
                    );
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag {other}"));
                }
                _ => {
                    command = arg.to_string();
                }
            }
        }
        Ok(Self {
            database,
            command,
            ranker,
        })
    }

    fn help() -> &'static str {
        "Usage: prefgraph [--db memory|PATH] [--command status|items|rankers|prefs] [--ranker ID]\n"
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", Config::help());
        return;
    }
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let config = match Config::from_args(&arg_refs) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    if let Err(err) = run_command(&store, &config) {
        eprintln!("command failed: {err}");
        process::exit(1);
    }
}

fn open_store(config: &Config) -> Result<PreferenceStore, String> {
    if config.database == "memory" {
        PreferenceStore::open_in_memory().map_err(|e| e.to_string())
    } else {
        let path = PathBuf::from(&config.database);
        PreferenceStore::open(path).map_err(|e| e.to_string())
    }
}

fn run_command(store: &PreferenceStore, config: &Config) -> Result<(), PrefGraphError> {
    match config.command.as_str() {
        "status" => print_status(store),
        "items" => {
            for entity in store.list(EntityKind::Item)? {
                println!("{}:{}", entity.id, entity.public_id);
            }
            Ok(())
        }
        "rankers" => {
            for entity in store.list(EntityKind::Ranker)? {
                println!("{}:{}", entity.id, entity.public_id);
            }
            Ok(())
        }
        "prefs" => {
            let ranker = config
                .ranker
                .as_deref()
                .ok_or_else(|| PrefGraphError::invalid_input("prefs requires --ranker"))?;
            for (preferred, nonpreferred) in store.query().direct_preferences(ranker)? {
                println!("{} > {}", preferred.public_id, nonpreferred.public_id);
            }
            Ok(())
        }
        other => {
            println!("unknown command {other}, defaulting to status");
            print_status(store)
        }
    }
}

fn print_status(store: &PreferenceStore) -> Result<(), PrefGraphError> {
    let items = store.list(EntityKind::Item)?.len();
    let rankers = store.list(EntityKind::Ranker)?.len();
    println!("backend=sqlite items={items} rankers={rankers}");
    Ok(())
}
