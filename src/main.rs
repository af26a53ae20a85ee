mod debug_report;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use tapspan::{PackError, Recognizer, RuleStore, DEFAULT_PACK};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let store = match load_store(config.pack.as_deref()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let entities = Recognizer::new(&store).recognize(&config.input);
    debug_report::print_run(&config.input, &entities, config.color);
}

struct CliConfig {
    input: String,
    pack: Option<PathBuf>,
    color: bool,
}

fn load_store(pack: Option<&Path>) -> Result<RuleStore, PackError> {
    match pack {
        Some(path) => RuleStore::from_pack_file(path),
        None => RuleStore::from_pack_str(DEFAULT_PACK),
    }
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut pack: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("tapspan {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--pack" => {
                let value = args
                    .next()
                    .ok_or_else(|| "error: --pack expects a file path".to_string())?;
                pack = Some(PathBuf::from(value));
            }
            "--input" | "-i" => {
                let value = args
                    .next()
                    .ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--pack=") => {
                let value = arg.trim_start_matches("--pack=");
                pack = Some(PathBuf::from(value));
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg)
                    .chain(args)
                    .collect::<Vec<_>>()
                    .join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, pack, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "tapspan {version}

Rule-driven phone number and date-time recognizer CLI.

Usage:
  tapspan [OPTIONS] [--] <input...>
  tapspan [OPTIONS] --input <text>

Options:
  -i, --input <text>   Input text to scan. If omitted, reads remaining args
                       or stdin when no args are provided.
  --pack <file>        JSON rule pack to load instead of the built-in one.
  --color              Force ANSI color output.
  --no-color           Disable ANSI color output.
  -h, --help           Show this help message.
  -V, --version        Print version information.

Exit codes:
  0  Success.
  1  Rule pack failed to load.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
