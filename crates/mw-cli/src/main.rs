use anyhow::{Context, bail};
use clap::Parser;
use mw_config::MockwrightConfig;
use mw_synth::Translator;

mod cli;
mod output;
mod settings;

fn main() {
    if let Err(error) = run() {
        eprintln!("mockwright error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    if cli.schema {
        println!("{}", output::schema()?);
        return Ok(());
    }
    let header = cli.header.clone().context("no header given")?;

    if cli.dump_tree {
        let source = std::fs::read_to_string(&header)
            .with_context(|| format!("failed to read {}", header.display()))?;
        print!("{}", mw_parser::dump_source(&source));
        return Ok(());
    }

    let config =
        MockwrightConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let settings = settings::resolve(&cli, config);
    let pretty = settings.pretty;
    let translator = Translator::new(settings.translator)?;

    let report = translator
        .translate_file(&header)
        .with_context(|| format!("failed to translate {}", header.display()))?;

    if cli.stdout {
        println!("{}", output::render(&report.specs, pretty)?);
    } else {
        output::write_specs(&settings.output_dir, &report.specs, pretty)?;
    }

    for failure in &report.failures {
        eprintln!("mockwright: {}: {}", failure.interface, failure.error);
    }
    if !report.is_success() {
        bail!(
            "{} of {} interfaces in {} could not be translated",
            report.failures.len(),
            report.attempted(),
            header.display()
        );
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MOCKWRIGHT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
