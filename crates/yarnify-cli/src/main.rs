use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use yarnify_config::Config;
use yarnify_engine::io::{self as docs_io, FileOutcome};
use yarnify_engine::{SourceFormat, translate_source};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Print,
    Write,
    Check,
}

#[derive(Debug, Parser)]
#[command(
    name = "yarnify",
    version,
    about = "Rewrites `npm install` commands in documentation into their yarn equivalents",
    after_help = "With no PATH, reads text from stdin (or uses `root` from the config file)."
)]
struct CliArgs {
    /// Treat input as text, markdown or html
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<SourceFormat>,

    /// Rewrite changed files in place
    #[arg(short, long, conflicts_with = "check")]
    write: bool,

    /// List files that would change; exit 1 if any
    #[arg(short, long)]
    check: bool,

    /// Use this config file instead of discovering one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Files or directories to translate; `-` reads stdin
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

impl CliArgs {
    fn mode(&self) -> Mode {
        if self.write {
            Mode::Write
        } else if self.check {
            Mode::Check
        } else {
            Mode::Print
        }
    }
}

fn load_config(args: &CliArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display()));
    }

    let cwd = env::current_dir().context("failed to resolve working directory")?;
    Ok(Config::discover(&cwd)?.unwrap_or_default())
}

fn translate_stdin(args: &CliArgs, config: &Config) -> Result<ExitCode> {
    let mode = args.mode();
    if mode == Mode::Write {
        bail!("--write needs file or directory paths");
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let format = args.format.or(config.format).unwrap_or(SourceFormat::Text);
    let output = translate_source(&input, format, &config.rewrite_options());

    match mode {
        Mode::Check if output != input => {
            println!("<stdin>");
            Ok(ExitCode::FAILURE)
        }
        Mode::Check => Ok(ExitCode::SUCCESS),
        _ => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn collect_files(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>> {
    let exclude = config.exclude_patterns()?;
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let found = docs_io::scan_source_files(path, &exclude)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            log::info!("Found {} files under {}", found.len(), path.display());
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn translate_paths(args: &CliArgs, config: &Config, paths: &[PathBuf]) -> Result<ExitCode> {
    let mode = args.mode();
    let options = config.rewrite_options();
    let mut changed = 0;

    for file in collect_files(paths, config)? {
        let outcome: FileOutcome = match mode {
            Mode::Write => docs_io::rewrite_file(&file, args.format, &options),
            Mode::Print | Mode::Check => docs_io::translate_file(&file, args.format, &options),
        }
        .with_context(|| format!("failed to translate {}", file.display()))?;

        if outcome.changed {
            changed += 1;
        }

        match mode {
            Mode::Print => print!("{}", outcome.content),
            Mode::Check if outcome.changed => println!("{}", outcome.path.display()),
            Mode::Write if outcome.changed => {
                log::info!("Rewrote {}", outcome.path.display());
                println!("rewrote {}", outcome.path.display());
            }
            _ => log::debug!("Unchanged {}", outcome.path.display()),
        }
    }

    log::info!("{changed} file(s) with npm install commands");

    if mode == Mode::Check && changed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run(args: &CliArgs) -> Result<ExitCode> {
    let config = load_config(args)?;

    let reads_stdin = args.paths.iter().any(|p| p.as_os_str() == "-");
    if reads_stdin {
        if args.paths.len() > 1 {
            bail!("'-' (stdin) cannot be combined with other paths");
        }
        return translate_stdin(args, &config);
    }

    if !args.paths.is_empty() {
        return translate_paths(args, &config, &args.paths);
    }

    if io::stdin().is_terminal() {
        match &config.root {
            Some(root) => {
                log::info!("Using root from config: {}", root.display());
                translate_paths(args, &config, std::slice::from_ref(root))
            }
            None => bail!(
                "no input: pass paths, pipe text on stdin, or set `root` in {} (see --help)",
                Config::config_path().display()
            ),
        }
    } else {
        translate_stdin(args, &config)
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
