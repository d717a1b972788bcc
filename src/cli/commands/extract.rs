use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::{CommandResult, CommandSummary, ExtractSummary};
use crate::{
    cli::{args::ExtractCommand, report},
    config::resolve_config,
    core::{ExtractContext, Translator},
    translator::CommandTranslator,
};

pub fn extract(cmd: ExtractCommand, cwd: &Path) -> Result<CommandResult> {
    let verbose = cmd.args.config.verbose;
    let loaded = resolve_config(cwd, &cmd.args.config.source(), &cmd.args.overrides())?;

    if verbose {
        match &loaded.path {
            Some(path) => eprintln!("{} {}", "config".bold().cyan(), path.display()),
            None => eprintln!("{} no config file, using defaults", "config".bold().cyan()),
        }
    }

    let ctx = ExtractContext::new(loaded.config, cwd, verbose)?;

    // validate() guarantees a command whenever translation is wanted.
    let translator = match &ctx.config.translate_command {
        Some(argv) if ctx.config.wants_translation() => Some(
            CommandTranslator::new(argv.clone()).context("Invalid 'translateCommand'")?,
        ),
        _ => None,
    };

    let report = ctx.run(
        translator.as_ref().map(|t| t as &dyn Translator),
        |progress| report::print_progress(cwd, progress),
    )?;

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            report,
            root_dir: ctx.root_dir.clone(),
            cwd: cwd.to_path_buf(),
            verbose,
        }),
    })
}
