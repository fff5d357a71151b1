//! Command-line interface for pagetree
//! Converts an exported page-builder HTML file into pagetree JSON.
//!
//! Usage:
//!   pagetree `<input>` [-o `<file>`] [--compact] [--copy] [--save-dialog]
//!            [--styleguide `<file>`] [--stable-ids] [--validate] [--config `<file>`]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{info, warn};
use pagetree_config::PageTreeConfig;
use pagetree_ir::{ParseOptions, schema::validate_page_tree, serialize, try_parse_html};

fn cli() -> Command {
    Command::new("pagetree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts page-builder HTML into pagetree JSON")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("HTML file to convert ('-' reads stdin)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write the JSON to this file instead of stdout"),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Emit single-line JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("copy")
                .long("copy")
                .help("Also copy the JSON to the clipboard")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-dialog")
                .long("save-dialog")
                .help("Choose the output file with the native save dialog")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("styleguide")
                .long("styleguide")
                .help("Styleguide JSON used instead of the one embedded in the page"),
        )
        .arg(
            Arg::new("stable-ids")
                .long("stable-ids")
                .help("Generate reproducible counter-based ids")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("validate")
                .long("validate")
                .help("Check the result against the pagetree JSON schema")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file (default: ./pagetree.toml)"),
        )
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();
    if let Err(err) = run(&matches) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// Config file, then environment, then flags.
fn load_config(matches: &ArgMatches) -> Result<PageTreeConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => PageTreeConfig::load_from_file(path)?,
        None => PageTreeConfig::load_or_default(),
    };
    config.merge_with_env();
    apply_flags(&mut config, matches);
    Ok(config)
}

fn apply_flags(config: &mut PageTreeConfig, matches: &ArgMatches) {
    if matches.get_flag("compact") {
        config.output.pretty = false;
    }
    if matches.get_flag("copy") {
        config.output.copy_to_clipboard = true;
    }
    if matches.get_flag("stable-ids") {
        config.parse.stable_ids = true;
    }
    if let Some(path) = matches.get_one::<String>("output") {
        config.output.file_name = Some(PathBuf::from(path));
    }
    if let Some(path) = matches.get_one::<String>("styleguide") {
        config.parse.styleguide = Some(PathBuf::from(path));
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read HTML file '{input}'"))
}

fn parse_options(config: &PageTreeConfig) -> Result<ParseOptions> {
    let options = ParseOptions {
        stable_ids: config.parse.stable_ids,
        ..ParseOptions::default()
    };
    let Some(path) = &config.parse.styleguide else {
        return Ok(options);
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read styleguide '{}'", path.display()))?;
    options
        .with_styleguide_json(&source)
        .with_context(|| format!("invalid styleguide '{}'", path.display()))
}

fn default_file_name(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| *stem != "-")
        .map(|stem| format!("{stem}.pagetree.json"))
        .unwrap_or_else(|| "pagetree.json".to_string())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let input = matches
        .get_one::<String>("input")
        .context("missing input file")?;

    let html = read_input(input)?;
    let tree = try_parse_html(&html, &parse_options(&config)?)?;
    if matches.get_flag("validate") {
        validate_page_tree(&tree)?;
        info!("page tree satisfies the schema");
    }
    let json = serialize(&tree, config.output.pretty)?;

    let destination = if matches.get_flag("save-dialog") {
        let picked = pagetree_io::pick_save_path(&default_file_name(input));
        if picked.is_none() {
            warn!("no file chosen; writing to stdout");
        }
        picked
    } else {
        config.output.file_name.clone()
    };
    match destination {
        Some(path) => pagetree_io::write_to_file(&path, &json)?,
        None => println!("{json}"),
    }

    if config.output.copy_to_clipboard {
        pagetree_io::copy_to_clipboard(&json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn flags_override_environment() -> Result<()> {
        let matches = cli().try_get_matches_from([
            "pagetree",
            "page.html",
            "--compact",
            "--stable-ids",
            "-o",
            "out.json",
        ])?;
        let vars = HashMap::from([
            ("PAGETREE_PRETTY", "true"),
            ("PAGETREE_OUTPUT", "env.json"),
            ("PAGETREE_STYLEGUIDE", "guide.json"),
        ]);
        let mut config = PageTreeConfig::default();
        config.merge_with_lookup(|name| vars.get(name).map(|value| value.to_string()));
        apply_flags(&mut config, &matches);

        assert!(!config.output.pretty);
        assert!(config.parse.stable_ids);
        assert_eq!(config.output.file_name, Some(PathBuf::from("out.json")));
        assert_eq!(config.parse.styleguide, Some(PathBuf::from("guide.json")));
        assert!(!config.output.copy_to_clipboard);
        Ok(())
    }

    #[test]
    fn default_file_name_follows_input() {
        assert_eq!(default_file_name("site/landing.html"), "landing.pagetree.json");
        assert_eq!(default_file_name("-"), "pagetree.json");
    }

    #[test]
    fn command_definition_is_consistent() {
        cli().debug_assert();
    }
}
