use std::path::PathBuf;

use anyhow::{anyhow, Context};
use dotenvy::dotenv;
use tracing::{error, info};

mod catalog;
mod config;
mod db;
mod error;
mod handlers;
mod llm;
mod state;
mod utils;
mod wardrobe;

use catalog::{Catalog, CatalogSet, Locale};
use config::CONFIG;
use db::Database;
use handlers::{editor, presets, try_on};
use state::AppState;
use utils::logging::init_logging;
use wardrobe::translation::check_isomorphism;
use wardrobe::{FieldPath, Gender, RandomPicker};

fn usage() -> &'static str {
    "Usage: cargo run -- <command> [options]

Commands:
  prompt            Print the prompt compiled from the given choices
  edit              Edit a photo with the given choices (--image <path> [--prompt-file <path>])
  try-on            Dress a person in a garment (--person <path> --garment <path>)
  presets list      List built-in and saved presets
  presets save      Save the given choices (--name <name>)
  presets show      Print a saved preset as JSON (--id <id>)
  presets delete    Delete a saved preset (--id <id>)
  catalog check     Verify that the locale catalogs are structurally parallel
  catalog options   List the values offered for a field (--path <path>), after applying the choices

Choice options (prompt, edit, presets save, catalog options):
  --locale <en|pt>          Catalog the values below come from
  --custom-preset <id>      Start from a saved preset
  --preset <id>             Apply a built-in style preset
  --set <path>=<value>      Set a single-valued field, e.g. --set hair.color=red
  --toggle <path>=<value>   Add or remove a value of a list field, e.g. --toggle poseDetail=...
  --gender <male|female|uncertain>   Gender used by `prompt` (default uncertain)"
}

#[derive(Debug, Default, PartialEq)]
struct SelectionArgs {
    locale: Option<Locale>,
    custom_preset: Option<String>,
    preset: Option<String>,
    sets: Vec<(FieldPath, String)>,
    toggles: Vec<(FieldPath, String)>,
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Prompt {
        selections: SelectionArgs,
        gender: Gender,
    },
    Edit {
        selections: SelectionArgs,
        image: Option<PathBuf>,
        prompt_file: Option<PathBuf>,
    },
    TryOn {
        person: Option<PathBuf>,
        garment: Option<PathBuf>,
    },
    PresetsList {
        locale: Option<Locale>,
    },
    PresetsSave {
        selections: SelectionArgs,
        name: String,
    },
    PresetsShow {
        id: String,
    },
    PresetsDelete {
        id: String,
    },
    CatalogCheck,
    CatalogOptions {
        selections: SelectionArgs,
        path: FieldPath,
    },
}

fn parse_assignment(flag: &str, raw: &str) -> anyhow::Result<(FieldPath, String)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("{flag} expects <path>=<value>, got '{raw}'"))?;
    let path = FieldPath::parse(path)?;
    Ok((path, value.trim().to_string()))
}

fn parse_args(args: &[String]) -> anyhow::Result<CliCommand> {
    let mut index = 1;
    let command = match (
        args.get(1).map(String::as_str),
        args.get(2).map(String::as_str),
    ) {
        (Some("presets"), Some(sub)) | (Some("catalog"), Some(sub)) => {
            index += 2;
            format!("{} {}", args[1], sub)
        }
        (Some(command), _) => {
            index += 1;
            command.to_string()
        }
        (None, _) => return Err(anyhow!(usage())),
    };

    let mut selections = SelectionArgs::default();
    let mut gender = Gender::Uncertain;
    let mut image = None;
    let mut prompt_file = None;
    let mut person = None;
    let mut garment = None;
    let mut name = None;
    let mut id = None;
    let mut field = None;

    while index < args.len() {
        let flag = args[index].as_str();
        if matches!(flag, "--help" | "-h") {
            return Err(anyhow!(usage()));
        }
        index += 1;
        let value = args
            .get(index)
            .ok_or_else(|| anyhow!("Missing value for {flag}"))?;
        match flag {
            "--locale" => {
                let locale = Locale::parse(value)
                    .ok_or_else(|| anyhow!("Invalid --locale value: {value}"))?;
                selections.locale = Some(locale);
            }
            "--preset" => selections.preset = Some(value.clone()),
            "--custom-preset" => selections.custom_preset = Some(value.clone()),
            "--set" => selections.sets.push(parse_assignment(flag, value)?),
            "--toggle" => selections.toggles.push(parse_assignment(flag, value)?),
            "--gender" => gender = Gender::parse(value),
            "--image" => image = Some(PathBuf::from(value)),
            "--prompt-file" => prompt_file = Some(PathBuf::from(value)),
            "--person" => person = Some(PathBuf::from(value)),
            "--garment" => garment = Some(PathBuf::from(value)),
            "--name" => name = Some(value.clone()),
            "--id" => id = Some(value.clone()),
            "--path" => field = Some(FieldPath::parse(value)?),
            other => {
                return Err(anyhow!("Unknown argument: {other}\n{}", usage()));
            }
        }
        index += 1;
    }

    let required_id = |id: Option<String>| id.ok_or_else(|| anyhow!("--id is required"));
    Ok(match command.as_str() {
        "prompt" => CliCommand::Prompt { selections, gender },
        "edit" => CliCommand::Edit {
            selections,
            image,
            prompt_file,
        },
        "try-on" => CliCommand::TryOn { person, garment },
        "presets list" => CliCommand::PresetsList {
            locale: selections.locale,
        },
        "presets save" => {
            let name = name
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| anyhow!("--name is required"))?;
            CliCommand::PresetsSave { selections, name }
        }
        "presets show" => CliCommand::PresetsShow {
            id: required_id(id)?,
        },
        "presets delete" => CliCommand::PresetsDelete {
            id: required_id(id)?,
        },
        "catalog check" => CliCommand::CatalogCheck,
        "catalog options" => CliCommand::CatalogOptions {
            selections,
            path: field.ok_or_else(|| anyhow!("--path is required"))?,
        },
        other => return Err(anyhow!("Unknown command: {other}\n{}", usage())),
    })
}

/// Builds the session from the command line: saved preset first, then the
/// built-in preset, then individual fields in the order given.
async fn apply_selection_args(state: &AppState, args: &SelectionArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.custom_preset {
        presets::apply_custom_preset(state, id).await?;
    }
    if let Some(id) = &args.preset {
        presets::apply_style_preset(state, id)?;
    }

    let catalog = state.catalog();
    for (path, value) in &args.sets {
        state.update_selections(|selections| selections.set_field(path, value))?;
        let selections = state.selections();
        if !value.is_empty() && !catalog.offers(path, value, &selections) {
            return Err(anyhow!(
                "'{value}' is not an option for {path} in the {} catalog",
                state.locale()
            ));
        }
    }
    for (path, value) in &args.toggles {
        let selections = state.selections();
        if !catalog.offers(path, value, &selections) {
            return Err(anyhow!(
                "'{value}' is not an option for {path} in the {} catalog",
                state.locale()
            ));
        }
        state.update_selections(|selections| selections.toggle(path, value))?;
    }
    Ok(())
}

fn run_catalog_check() -> anyhow::Result<()> {
    let en = Catalog::embedded(Locale::En)?;
    let pt = Catalog::embedded(Locale::Pt)?;
    let drift = check_isomorphism(en.raw(), pt.raw());
    if drift.is_empty() {
        let catalogs = CatalogSet::from_catalogs(en, pt)?;
        println!(
            "Catalogs are parallel; {} localized values translate to English.",
            catalogs.translation().len()
        );
        return Ok(());
    }
    for entry in &drift {
        println!("{entry}");
    }
    Err(anyhow!("{} catalog mismatch(es) found", drift.len()))
}

async fn open_state(locale: Option<Locale>) -> anyhow::Result<AppState> {
    let catalogs = CatalogSet::load()?;
    let db = Database::init(&CONFIG.database_url, &CONFIG.presets_storage_key)
        .await
        .context("failed to open preset storage")?;
    Ok(AppState::new(
        db,
        catalogs,
        locale.unwrap_or(CONFIG.default_locale),
    ))
}

async fn run(command: CliCommand) -> anyhow::Result<()> {
    match command {
        CliCommand::CatalogCheck => run_catalog_check()?,
        CliCommand::CatalogOptions { selections, path } => {
            let state = open_state(selections.locale).await?;
            apply_selection_args(&state, &selections).await?;
            match state.catalog().choices(&path, &state.selections()) {
                None => println!("{path} is free text; any value is accepted."),
                Some(choices) if choices.is_empty() => {
                    println!("No values are offered for {path} with the current choices.")
                }
                Some(choices) => {
                    for (label, value) in choices {
                        println!("{value:<40} {label}");
                    }
                }
            }
        }
        CliCommand::Prompt { selections, gender } => {
            let state = open_state(selections.locale).await?;
            apply_selection_args(&state, &selections).await?;
            let prompt = editor::build_prompt(
                &state.catalogs,
                state.locale(),
                &state.selections(),
                gender,
                &RandomPicker,
            )?;
            println!("{prompt}");
        }
        CliCommand::Edit {
            selections,
            image,
            prompt_file,
        } => {
            CONFIG.require_api_key()?;
            let state = open_state(selections.locale).await?;
            apply_selection_args(&state, &selections).await?;
            let prompt_override = match prompt_file {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("failed to read {}", path.display()))?,
                ),
                None => None,
            };
            let saved = editor::edit_handler(&state, image.as_deref(), prompt_override).await?;
            println!("{}", saved.path.display());
            println!("\"{}\"", saved.description);
        }
        CliCommand::TryOn { person, garment } => {
            CONFIG.require_api_key()?;
            let state = open_state(None).await?;
            let saved =
                try_on::try_on_handler(&state, person.as_deref(), garment.as_deref()).await?;
            println!("{}", saved.path.display());
            println!("\"{}\"", saved.description);
        }
        CliCommand::PresetsList { locale } => {
            let state = open_state(locale).await?;
            let listing = presets::list_presets(&state).await?;
            println!("Style presets:");
            for preset in &listing.built_in {
                println!("  {:<16} {} - {}", preset.id, preset.name, preset.description);
            }
            println!("My presets:");
            if listing.custom.is_empty() {
                println!("  (none saved yet)");
            }
            for preset in &listing.custom {
                println!(
                    "  {:<16} {} (saved {})",
                    preset.id,
                    preset.name,
                    preset.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        CliCommand::PresetsSave { selections, name } => {
            let state = open_state(selections.locale).await?;
            apply_selection_args(&state, &selections).await?;
            let preset = presets::save_preset(&state, &name).await?;
            println!("Saved preset '{}' with id {}", preset.name, preset.id);
        }
        CliCommand::PresetsShow { id } => {
            let state = open_state(None).await?;
            let preset = presets::show_preset(&state, &id).await?;
            println!("{}", serde_json::to_string_pretty(&preset)?);
        }
        CliCommand::PresetsDelete { id } => {
            let state = open_state(None).await?;
            presets::delete_preset(&state, &id).await?;
            println!("Deleted preset {id}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _guards = init_logging();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;
    info!("Running {:?}", command);

    if let Err(err) = run(command).await {
        match err.downcast_ref::<error::WardrobeError>() {
            Some(wardrobe_err) => error!("Command failed ({}): {}", wardrobe_err.key(), err),
            None => error!("Command failed: {err:#}"),
        }
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClothingCategory;
    use crate::wardrobe::selections::{ClothingField, HairField};

    fn args(raw: &[&str]) -> Vec<String> {
        std::iter::once("virtual_wardrobe")
            .chain(raw.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn prompt_command_collects_choices_in_order() {
        let command = parse_args(&args(&[
            "prompt",
            "--locale",
            "pt-BR",
            "--set",
            "hair.color=ruivo",
            "--toggle",
            "clothing.tops.style=gola V",
            "--gender",
            "female",
        ]))
        .unwrap();

        let CliCommand::Prompt { selections, gender } = command else {
            panic!("expected prompt command");
        };
        assert_eq!(gender, Gender::Female);
        assert_eq!(selections.locale, Some(Locale::Pt));
        assert_eq!(
            selections.sets,
            vec![(FieldPath::Hair(HairField::Color), "ruivo".to_string())]
        );
        assert_eq!(
            selections.toggles,
            vec![(
                FieldPath::Clothing(ClothingCategory::Tops, ClothingField::Style),
                "gola V".to_string()
            )]
        );
    }

    #[test]
    fn two_word_commands_parse() {
        assert_eq!(
            parse_args(&args(&["presets", "delete", "--id", "42"])).unwrap(),
            CliCommand::PresetsDelete {
                id: "42".to_string()
            }
        );
        assert_eq!(
            parse_args(&args(&["catalog", "check"])).unwrap(),
            CliCommand::CatalogCheck
        );
        assert_eq!(
            parse_args(&args(&["catalog", "options", "--path", "poseDetail"])).unwrap(),
            CliCommand::CatalogOptions {
                selections: SelectionArgs::default(),
                path: FieldPath::PoseDetail,
            }
        );
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["prompt", "--set", "hair.color"])).is_err());
        assert!(parse_args(&args(&["prompt", "--set", "hair.shine=high"])).is_err());
        assert!(parse_args(&args(&["prompt", "--locale"])).is_err());
        assert!(parse_args(&args(&["presets", "save"])).is_err());
        assert!(parse_args(&args(&["catalog", "options"])).is_err());
        assert!(parse_args(&args(&["dance"])).is_err());
    }
}
