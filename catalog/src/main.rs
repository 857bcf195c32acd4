use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use catalog::{
    config::{CatalogConfig, DEFAULT_CONFIG_FILE},
    ctx::AppContext,
    describe::paint,
    filter::CourseFilters,
    forms::{self, FormKind},
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use formtree::{FormSession, RendererRegistry};
use log::info;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

#[derive(Parser)]
#[command(name = "catalog", about = "Course catalog browser and admin forms", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Catalog API base URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory of JSON collections (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List courses, optionally filtered
    Courses {
        /// Subject type to include (repeatable)
        #[arg(long = "subject")]
        subjects: Vec<String>,

        /// Difficulty type to include (repeatable)
        #[arg(long = "difficulty")]
        difficulties: Vec<String>,

        /// Grade to include (repeatable)
        #[arg(long = "grade")]
        grades: Vec<u32>,

        /// Print matching courses as JSON
        #[arg(long)]
        json: bool,
    },

    /// List subjects
    Subjects,

    /// List difficulty levels
    Difficulties,

    /// List grades
    Grades,

    /// Fill an admin form and print the resulting record
    Form {
        /// Record type to edit
        #[arg(value_enum)]
        kind: FormKind,

        /// Load an existing record from a JSON file
        #[arg(long)]
        from: Option<PathBuf>,

        /// Append a blank element to the array at PATH (repeatable, applied first)
        #[arg(long = "add", value_name = "PATH")]
        adds: Vec<String>,

        /// Set the input at PATH (repeatable)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<formtree::Edit>,
    },

    /// Print the JSON Schema of the config file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Schema => {
            let schema = schemars::schema_for!(CatalogConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Form {
            kind,
            from,
            adds,
            sets,
        } => {
            let edits: Vec<formtree::Edit> = adds
                .into_iter()
                .map(formtree::Edit::append)
                .chain(sets)
                .collect();
            match kind {
                FormKind::Subject => {
                    fill_form(forms::subject_form()?, from.as_deref(), &edits).await
                }
                FormKind::Difficulty => {
                    fill_form(forms::difficulty_form()?, from.as_deref(), &edits).await
                }
                FormKind::Course => {
                    fill_form(forms::course_form()?, from.as_deref(), &edits).await
                }
            }
        }
        command => {
            let mut config = CatalogConfig::load(&cli.config).await?;
            if let Some(url) = cli.api_url {
                config.api_url = Some(url);
            }
            if let Some(dir) = cli.data_dir {
                config.data_dir = Some(dir);
            }
            let mut ctx = AppContext::new(config)?;
            ctx.load().await?;
            browse(&mut ctx, command)
        }
    }
}

fn browse(ctx: &mut AppContext, command: Commands) -> Result<()> {
    let catalog = &mut ctx.catalog;
    match command {
        Commands::Courses {
            subjects,
            difficulties,
            grades,
            json,
        } => {
            let filters = CourseFilters {
                subject_types: subjects,
                difficulty_types: difficulties,
                grades,
            };
            if json {
                let courses = catalog
                    .filtered_courses(&filters)
                    .context("courses are not loaded")?;
                println!("{}", serde_json::to_string_pretty(&courses)?);
                return Ok(());
            }
            let cards = catalog.cards(&filters).context("catalog is not loaded")?;
            info!("{} course(s) match", cards.len());
            for card in cards {
                println!("{card}");
            }
        }
        Commands::Subjects => {
            let lookup = catalog.subject_lookup().context("subjects are not loaded")?;
            for (key, subject) in lookup.iter() {
                println!(
                    "{:<16} {} {}",
                    key.bold(),
                    paint("■", &subject.color),
                    subject.label
                );
                for line in &subject.additional_description {
                    println!("{:<16}   {}", "", line.dimmed());
                }
            }
        }
        Commands::Difficulties => {
            let lookup = catalog
                .difficulty_lookup()
                .context("difficulties are not loaded")?;
            for (key, difficulty) in lookup.iter() {
                println!(
                    "{:<16} {} {}",
                    key.bold(),
                    paint("■", &difficulty.color),
                    difficulty.label
                );
            }
        }
        Commands::Grades => {
            let grades = catalog.grades.data().context("grades are not loaded")?;
            let mut grades: Vec<u32> = grades.iter().map(|g| g.grade).collect();
            grades.sort_unstable();
            grades.dedup();
            for grade in grades {
                println!("{grade} класс");
            }
        }
        Commands::Form { .. } | Commands::Schema => {
            anyhow::bail!("command does not browse the catalog")
        }
    }
    Ok(())
}

async fn fill_form<C>(
    session: FormSession<C>,
    from: Option<&Path>,
    edits: &[formtree::Edit],
) -> Result<()>
where
    C: JsonSchema + DeserializeOwned + Serialize,
{
    if let Some(path) = from {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: C = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a valid record", path.display()))?;
        session.load(&record)?;
    }
    for edit in edits {
        session.apply(edit)?;
    }

    let element = session.render(&RendererRegistry::with_stock())?;
    println!("{}", "Form".bold().underline());
    print!("{element}");

    let record = session.record()?;
    println!("{}", "Record".bold().underline());
    println!("{}", serde_json::to_string_pretty(&record)?);
    if !session.needs_save() {
        info!("form unchanged");
    }
    Ok(())
}
