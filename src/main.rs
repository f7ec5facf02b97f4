use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};

use cloudfs::{CloudFs, Config, LocalDirStore};

const USAGE: &str = "usage: cloudfs [--documents] <ls|mkdir|exists|put> <path> [local-file]";

/// One invocation of the binary.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    List(&'a str),
    MakeDir(&'a str),
    Exists(&'a str),
    Put { path: &'a str, local: &'a str },
}

/// Parse arguments into the documents flag and a command, `None` on bad usage.
fn parse_args(args: &[String]) -> Option<(bool, Command<'_>)> {
    let (use_documents, args) = match args.first().map(String::as_str) {
        Some("--documents") => (true, &args[1..]),
        _ => (false, args),
    };

    let command = match args {
        [cmd, path] if cmd == "ls" => Command::List(path),
        [cmd, path] if cmd == "mkdir" => Command::MakeDir(path),
        [cmd, path] if cmd == "exists" => Command::Exists(path),
        [cmd, path, local] if cmd == "put" => Command::Put { path, local },
        _ => return None,
    };
    Some((use_documents, command))
}

fn run(
    fs: &CloudFs<LocalDirStore>,
    use_documents: bool,
    command: Command<'_>,
) -> cloudfs::Result<()> {
    match command {
        Command::List(path) => {
            let listing = fs.list_directory(use_documents, path)?;
            let json = serde_json::to_string_pretty(&listing)
                .map_err(|e| cloudfs::CloudFsError::Io(e.into()))?;
            println!("{json}");
        }
        Command::MakeDir(path) => {
            let folder = fs.ensure_folder(use_documents, path)?;
            println!("{}", folder.id());
        }
        Command::Exists(path) => {
            println!("{}", fs.file_exists(use_documents, path)?);
        }
        Command::Put { path, local } => {
            let source = File::open(local)?;
            let mime = mime_guess::from_path(Path::new(path)).first_raw();
            let file = fs.upload(use_documents, path, mime, source)?;
            println!("{}", file.id());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((use_documents, command)) = parse_args(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = cloudfs::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        cloudfs::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let store = match LocalDirStore::open(&config.store.root_path) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open store at {}: {e}", config.store.root_path);
            return ExitCode::FAILURE;
        }
    };
    info!(
        root = %store.base_path().display(),
        app = %config.store.app_name,
        "Opened local store"
    );

    let fs = CloudFs::from_config(store, &config);
    match run(&fs, use_documents, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
