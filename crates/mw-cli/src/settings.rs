//! Command-line flags layered over the loaded configuration.

use std::path::PathBuf;

use mw_config::MockwrightConfig;
use mw_parser::ParseOptions;
use mw_synth::TranslatorSettings;

use crate::cli::Cli;

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub translator: TranslatorSettings,
    pub output_dir: PathBuf,
    pub pretty: bool,
}

/// Flags win over configuration values.
#[must_use]
pub fn resolve(cli: &Cli, config: MockwrightConfig) -> RunSettings {
    let MockwrightConfig {
        parser,
        generation,
        output,
    } = config;

    let translator = TranslatorSettings {
        parse: ParseOptions {
            strict: parser.strict && !cli.lenient,
            library: cli.parser_library.clone().or(parser.library),
        },
        class_pattern: cli.class_pattern.clone().unwrap_or(generation.class_pattern),
        mock_class: cli.mock_class.clone().unwrap_or(generation.mock_class),
        namespace: cli.namespace.clone().unwrap_or(generation.namespace),
        controller: cli.controller.clone().unwrap_or(generation.controller),
        access: cli.access.clone().unwrap_or(generation.access),
        slot_markers: generation.slot_markers,
    };

    RunSettings {
        translator,
        output_dir: cli.output.clone().unwrap_or(output.dir),
        pretty: output.pretty,
    }
}
