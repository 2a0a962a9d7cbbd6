//! muzekkere CLI - fill the court letter template

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Datelike, Local};
use clap::Parser;
use log::debug;

use muzekkere::{default_output_path, produce, CaseValues, Error, Profile, Textutil};

#[derive(Parser)]
#[command(name = "muzekkere")]
#[command(version)]
#[command(about = "Fill the court letter template with case values", long_about = None)]
struct Cli {
    /// Legacy template document (overrides the profile)
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Output document (default: <template>_filled_<timestamp>.DOC)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Template profile (TOML)
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Document converter program (overrides the profile)
    #[arg(long, value_name = "PROGRAM")]
    converter: Option<PathBuf>,

    /// Full name
    #[arg(long)]
    name: String,

    /// TC Kimlik No
    #[arg(long = "tc", value_name = "DIGITS")]
    national_id: String,

    /// Case number without the year
    #[arg(long, value_name = "DIGITS")]
    case_number: String,

    /// Date of the court's letter (DD/MM/YYYY)
    #[arg(long, value_name = "DATE")]
    court_date: String,

    /// Date this letter is prepared (DD/MM/YYYY)
    #[arg(long, value_name = "DATE")]
    prepared_date: String,

    /// Extra value for profile fields
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    extra: Vec<(String, String)>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> muzekkere::Result<PathBuf> {
    let mut profile = match &cli.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };
    if let Some(converter) = cli.converter {
        profile.converter = converter;
    }

    let template = cli
        .template
        .or_else(|| profile.template.clone())
        .ok_or_else(|| Error::InvalidValue("no template: pass --template or set it in the profile".into()))?;

    let now = Local::now();
    let values = CaseValues {
        full_name: cli.name.trim().to_string(),
        national_id: cli.national_id.trim().to_string(),
        case_number: cli.case_number.trim().to_string(),
        court_date: cli.court_date.trim().to_string(),
        prepared_date: cli.prepared_date.trim().to_string(),
        year: now.year(),
        extra: cli.extra.into_iter().collect(),
    };
    values.validate()?;

    let output = cli
        .output
        .unwrap_or_else(|| default_output_path(&template, now.naive_local()));
    debug!("template {}, output {}", template.display(), output.display());

    let transcoder = Textutil::new(&profile.converter);
    produce(&template, &output, &profile, &values, &transcoder)
}
