use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use twigify::config::{self, ConverterConfig};
use twigify::convert::{self, Artifact, ConvertError};
use twigify::stylesheet::Strategy;
use twigify::{output, variables};

/// Shared flag for commands that read a variables file.
#[derive(clap::Args, Clone)]
struct StrategyArgs {
    /// How variables are matched (overrides the config file)
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
}

#[derive(Parser)]
#[command(name = "twigify")]
#[command(about = "Convert static HTML to Twig and CSS to variable-driven SCSS")]
#[command(long_about = "\
Convert static HTML to Twig and CSS to variable-driven SCSS

HTML text content and attribute values become Twig placeholders:

  <a href=\"/about\">About</a>   →   <a href=\"{{ href_a }}\">{{ a_content }}</a>

CSS color literals become the SCSS variables that define them:

  $primary: #3366ff;           (variables file)
  a { color: #3366ff; }   →   a { color: $primary; }

The converted text is printed to stdout. With --out-dir it is also written
to output.twig / converted.scss (names configurable in twigify.toml).

Run 'twigify gen-config' to generate a documented twigify.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./twigify.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write artifacts into this directory
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an HTML file into a Twig skeleton
    Twig {
        /// HTML input
        html: PathBuf,
    },
    /// Replace CSS color literals with SCSS variables
    Scss {
        /// CSS input
        css: PathBuf,
        /// SCSS variables file
        #[arg(long)]
        variables: PathBuf,
        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Show the color → variable mapping parsed from a variables file
    Variables {
        /// SCSS variables file
        variables: PathBuf,
        #[command(flatten)]
        strategy: StrategyArgs,
        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run every conversion the given inputs allow
    Convert {
        /// HTML input (converted to Twig)
        #[arg(long)]
        html: Option<PathBuf>,
        /// CSS input (needs --variables)
        #[arg(long, requires = "variables")]
        css: Option<PathBuf>,
        /// SCSS variables file (needs --css)
        #[arg(long, requires = "css")]
        variables: Option<PathBuf>,
        #[command(flatten)]
        strategy: StrategyArgs,
    },
    /// Print a stock twigify.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns `Ok(false)` when a conversion failed but was already reported.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let site_config = config::load_config(cli.config.as_deref(), Path::new("."))?;
    let out_dir = cli.out_dir.as_deref();

    match cli.command {
        Command::Twig { html } => Ok(report(run_twig(&html, &site_config, out_dir))),
        Command::Scss {
            css,
            variables,
            strategy,
        } => {
            let site_config = with_strategy(site_config, &strategy);
            Ok(report(run_scss(&css, &variables, &site_config, out_dir)))
        }
        Command::Variables {
            variables: path,
            strategy,
            json,
        } => {
            let site_config = with_strategy(site_config, &strategy);
            let content = convert::read_input(&path)?;
            let map = variables::parse_with(site_config.stylesheet.strategy, &content);
            if json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                output::print_color_map(&map);
            }
            Ok(true)
        }
        Command::Convert {
            html,
            css,
            variables,
            strategy,
        } => {
            let site_config = with_strategy(site_config, &strategy);
            let mut ok = true;
            let mut ran = false;

            if let Some(html) = html {
                println!("==> Twig Output");
                ok &= report(run_twig(&html, &site_config, out_dir));
                ran = true;
            }
            if let (Some(css), Some(variables)) = (css, variables) {
                println!("==> SCSS Output");
                ok &= report(run_scss(&css, &variables, &site_config, out_dir));
                ran = true;
            }
            if !ran {
                eprintln!("Nothing to convert: pass --html and/or --css with --variables");
            }
            Ok(ok && ran)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(true)
        }
    }
}

fn with_strategy(mut site_config: ConverterConfig, args: &StrategyArgs) -> ConverterConfig {
    if let Some(strategy) = args.strategy {
        site_config.stylesheet.strategy = strategy;
    }
    site_config
}

/// Print a conversion error and turn the outcome into a success flag.
fn report(result: Result<(), ConvertError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

fn run_twig(
    html: &Path,
    site_config: &ConverterConfig,
    out_dir: Option<&Path>,
) -> Result<(), ConvertError> {
    let content = convert::read_input(html)?;
    let conversion = convert::html_to_twig(&content, &site_config.markup)?;
    print!("{}", conversion.artifact.content);
    let written = write_artifact(&conversion.artifact, out_dir)?;
    output::print_twig_summary(&conversion, written.as_deref());
    Ok(())
}

fn run_scss(
    css: &Path,
    variables: &Path,
    site_config: &ConverterConfig,
    out_dir: Option<&Path>,
) -> Result<(), ConvertError> {
    let css_content = convert::read_input(css)?;
    let variables_content = convert::read_input(variables)?;
    let conversion = convert::css_to_scss(&css_content, &variables_content, &site_config.stylesheet);
    println!("{}", conversion.artifact.content.trim_end_matches('\n'));
    let written = write_artifact(&conversion.artifact, out_dir)?;
    output::print_scss_summary(&conversion, written.as_deref());
    Ok(())
}

fn write_artifact(artifact: &Artifact, out_dir: Option<&Path>) -> Result<Option<PathBuf>, ConvertError> {
    let Some(dir) = out_dir else {
        return Ok(None);
    };
    artifact
        .write_to(dir)
        .map(Some)
        .map_err(|source| ConvertError::Io {
            path: dir.join(&artifact.file_name),
            source,
        })
}
