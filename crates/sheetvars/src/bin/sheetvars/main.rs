mod cli;

use sheetvars::document::{build, Conversion, SheetNameMap};
use sheetvars::workbook::{load_common, CommonParameters, ParameterSheets, COMMON_WORKBOOK};
use std::path::Path;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SHEETVARS_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Generate(generate_cli) => generate(generate_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn generate(cli: cli::GenerateCommand) -> anyhow::Result<()> {
    let (sheets, mapping, common) = load(&cli.input)?;

    // env routing is required as soon as a common workbook is in play;
    // fail before anything is written
    let env = match common.as_ref() {
        Some(common) => Some(
            common
                .env()
                .ok_or_else(|| anyhow::anyhow!("common workbook does not define 'env'"))?,
        ),
        None => None,
    };

    let conversion = build(&sheets, &mapping, common.as_ref());
    output(&cli, env.as_deref(), &conversion)?;

    Ok(())
}

fn load(
    input: &cli::InputArgs,
) -> anyhow::Result<(ParameterSheets, SheetNameMap, Option<CommonParameters>)> {
    let mapping = match &input.sheet_map {
        Some(path) => SheetNameMap::load(path)?,
        None => {
            let default = Path::new("sheetname_config.json");
            if default.exists() {
                SheetNameMap::load(default)?
            } else {
                SheetNameMap::default()
            }
        }
    };

    let common = match &input.common {
        Some(path) => Some(load_common(path)?),
        None => {
            let default = input.parameter_dir.join(COMMON_WORKBOOK);
            if default.exists() {
                Some(load_common(&default)?)
            } else {
                None
            }
        }
    };

    let mut sheets = ParameterSheets::default();
    sheets.load_directory(&input.parameter_dir)?;

    Ok((sheets, mapping, common))
}

fn output(cli: &cli::GenerateCommand, env: Option<&str>, conversion: &Conversion) -> anyhow::Result<()> {
    let out_dir = match env {
        Some(env) => cli.output_dir.join(env),
        None => cli.output_dir.clone(),
    };
    std::fs::create_dir_all(&out_dir)?;

    let tfvars_path = out_dir.join("terraform.tfvars");
    let mut text = conversion.document.to_hcl();
    if !text.is_empty() {
        text.push('\n');
    }
    std::fs::write(&tfvars_path, text)?;
    tracing::info!(path=%tfvars_path.display(), "tfvars written");

    for policy in &conversion.policies {
        let policy_dir = cli.output_dir.join("policies").join(&policy.workbook);
        std::fs::create_dir_all(&policy_dir)?;

        let policy_path = policy_dir.join(format!("{}.json", policy.resource));
        std::fs::write(&policy_path, serde_json::to_string_pretty(&policy.body)?)?;
        tracing::info!(path=%policy_path.display(), "policy written");
    }

    if !cli.no_fmt {
        if let Err(error) = sheetvars::terraform::fmt(&tfvars_path) {
            tracing::warn!(%error, "terraform fmt failed, keeping the written file");
        }
    }

    Ok(())
}

/// (sheetvars-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let (sheets, mapping, common) = load(&cli.input)?;

    match cli.command {
        Sheets => println!("{sheets:#?}"),
        Tree => {
            let conversion = build(&sheets, &mapping, common.as_ref());
            match cli.format {
                cli::OutputFormat::Yaml => {
                    serde_yaml::to_writer(std::io::stdout(), &conversion.document)?
                }
                cli::OutputFormat::Json => {
                    serde_json::to_writer_pretty(std::io::stdout(), &conversion.document)?
                }
            }
        }
    }

    Ok(())
}
