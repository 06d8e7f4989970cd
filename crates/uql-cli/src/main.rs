//! `uql-render` - print a saved UQL response as a table, JSON or YAML.
//!
//! Reads a response body from a file (or stdin), decodes and resolves it, and
//! writes it to stdout. Server errors carried in the response are reported on
//! stderr after the output. With `--follow`, continuation links are read as
//! paths relative to the input file and each page is printed in turn.

mod output;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use uql::{follow, DecoderConfig, Response, Transport};
use uql_render::TableConfig;

use crate::output::{format_response, OutputMode};

/// Render a saved UQL query response.
#[derive(Parser, Debug)]
#[command(name = "uql-render")]
#[command(version)]
#[command(about = "Render a saved UQL query response as a table, JSON or YAML")]
struct Cli {
    /// Response file to read; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputMode::Table)]
    output: OutputMode,

    /// YAML file with `decoder:` and `table:` sections
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dataset to start from (overrides the config file)
    #[arg(long, value_name = "NAME")]
    main_dataset: Option<String>,

    /// Follow the main dataset's link with this relation, page after page
    #[arg(long, value_name = "REL")]
    follow: Option<String>,

    /// Stop following links after this many extra pages
    #[arg(long, default_value_t = 10)]
    max_pages: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Settings read from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Settings {
    decoder: DecoderConfig,
    table: TableConfig,
}

impl Settings {
    fn load(path: &Path) -> Result<Settings> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        settings.decoder.validate()?;
        Ok(settings)
    }
}

/// Resolves continuation hrefs as files next to the first page.
struct FileTransport {
    base: PathBuf,
}

impl Transport for FileTransport {
    type Error = io::Error;

    fn fetch(&self, href: &str) -> Result<Vec<u8>, io::Error> {
        fs::read(self.base.join(href))
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            if atty::is(atty::Stream::Stdin) {
                bail!("no input: pass a response file or pipe one on stdin");
            }
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok(bytes)
        }
    }
}

fn report_server_errors(response: &Response) {
    for error in response.errors() {
        warn!(kind = %error.error_type, "server reported an error");
        eprintln!("error: {}", error);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(name) = cli.main_dataset {
        settings.decoder = settings.decoder.main_dataset(name);
        settings.decoder.validate()?;
    }

    let bytes = read_input(cli.input.as_deref())?;
    let mut response =
        Response::decode(bytes, &settings.decoder).context("failed to decode response")?;

    let transport = FileTransport {
        base: cli
            .input
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    let mut pages = 0;
    loop {
        let out = format_response(&response, cli.output, &settings.table)?;
        print!("{}", out);
        report_server_errors(&response);

        let Some(rel) = cli.follow.as_deref() else {
            break;
        };
        let Some(main) = response.main() else {
            break;
        };
        if pages >= cli.max_pages {
            debug!(pages, "page limit reached");
            break;
        }
        match follow(main, rel, &transport, &settings.decoder)? {
            Some(next) => response = next,
            None => break,
        }
        pages += 1;
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_flag() {
        let cli = Cli::try_parse_from(["uql-render", "-o", "yaml", "page.json"]).unwrap();
        assert_eq!(cli.output, OutputMode::Yaml);
        assert_eq!(cli.input, Some(PathBuf::from("page.json")));

        let cli = Cli::try_parse_from(["uql-render", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputMode::Table);
    }

    #[test]
    fn test_settings_sections_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table:\n  tab_width: 2").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.table.tab_width, 2);
        assert_eq!(settings.decoder, DecoderConfig::default());
    }

    #[test]
    fn test_settings_reject_empty_main_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decoder:\n  main_dataset: \"\"").unwrap();

        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_file_transport_reads_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page-2.json"), b"[]").unwrap();
        let transport = FileTransport {
            base: dir.path().to_path_buf(),
        };

        assert_eq!(transport.fetch("page-2.json").unwrap(), b"[]");
        assert!(transport.fetch("missing.json").is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        assert_eq!(read_input(Some(file.path())).unwrap(), b"[]");
    }
}
