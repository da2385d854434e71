use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use convotrain_core::{annotate, assemble, group_phrases, EntityDictionary, Segment};
use dialogflow::{AgentGateway, CallBudget, EntityType, Intent, JsonExportGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Column positions in the intents CSV: each row is `(phrase text, intent name)`.
const INTENT_COLUMN: usize = 1;
const TEXT_COLUMN: usize = 0;

#[derive(Parser)]
#[command(name = "convotrain")]
#[command(about = "Builds annotated training data for a conversational-intent agent")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate intent phrases and export intent request payloads
    ExportIntents {
        /// CSV file of training phrases: phrase text, intent name
        intents_file: PathBuf,
        /// CSV file of entities: entity name, canonical value, synonyms...
        entities_file: PathBuf,
        /// Project the payloads are addressed to
        project_id: String,
        /// Directory to write payload files into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// Export entity type request payloads
    ExportEntities {
        /// CSV file of entities: entity name, canonical value, synonyms...
        entities_file: PathBuf,
        /// Project the payloads are addressed to
        project_id: String,
        /// Directory to write payload files into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// List intents exported so far
    ListIntents {
        /// Project the agent belongs to
        project_id: String,
        /// Directory payload files were written into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// List entity types exported so far
    ListEntities {
        /// Project the agent belongs to
        project_id: String,
        /// Directory payload files were written into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// Write delete requests for every exported intent
    DeleteIntents {
        /// Project the agent belongs to
        project_id: String,
        /// Directory payload files were written into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// Write delete requests for every exported entity type
    DeleteEntities {
        /// Project the agent belongs to
        project_id: String,
        /// Directory payload files were written into
        #[arg(long, default_value = "export")]
        out_dir: PathBuf,
    },
    /// Annotate a single phrase and print its segments
    Annotate {
        /// The phrase to annotate
        phrase: String,
        /// CSV file of entities: entity name, canonical value, synonyms...
        entities_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("convotrain=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::ExportIntents {
            intents_file,
            entities_file,
            project_id,
            out_dir,
        }) => match export_intents(&intents_file, &entities_file, &project_id, &out_dir) {
            Ok(count) => println!("Exported {} intent payload(s) to {}", count, out_dir.display()),
            Err(e) => eprintln!("Error exporting intents: {e}"),
        },
        Some(Commands::ExportEntities {
            entities_file,
            project_id,
            out_dir,
        }) => match export_entities(&entities_file, &project_id, &out_dir) {
            Ok(count) => println!(
                "Exported {} entity type payload(s) to {}",
                count,
                out_dir.display()
            ),
            Err(e) => eprintln!("Error exporting entities: {e}"),
        },
        Some(Commands::ListIntents {
            project_id,
            out_dir,
        }) => match list_intents(&project_id, &out_dir) {
            Ok(names) if names.is_empty() => println!("No intents exported."),
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
            }
            Err(e) => eprintln!("Error listing intents: {e}"),
        },
        Some(Commands::ListEntities {
            project_id,
            out_dir,
        }) => match list_entities(&project_id, &out_dir) {
            Ok(names) if names.is_empty() => println!("No entity types exported."),
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
            }
            Err(e) => eprintln!("Error listing entity types: {e}"),
        },
        Some(Commands::DeleteIntents {
            project_id,
            out_dir,
        }) => match delete_intents(&project_id, &out_dir) {
            Ok(count) => println!("Wrote {count} intent delete request(s)"),
            Err(e) => eprintln!("Error deleting intents: {e}"),
        },
        Some(Commands::DeleteEntities {
            project_id,
            out_dir,
        }) => match delete_entities(&project_id, &out_dir) {
            Ok(count) => println!("Wrote {count} entity type delete request(s)"),
            Err(e) => eprintln!("Error deleting entity types: {e}"),
        },
        Some(Commands::Annotate {
            phrase,
            entities_file,
        }) => match annotate_phrase(&phrase, &entities_file) {
            Ok(()) => {}
            Err(e) => eprintln!("Error annotating phrase: {e}"),
        },
        None => {
            println!("Use 'convotrain --help' for commands");
        }
    }

    Ok(())
}

fn load_dictionary(entities_file: &Path) -> anyhow::Result<EntityDictionary> {
    let rows = convotrain_ingest::read_rows(entities_file)?;
    Ok(EntityDictionary::from_rows(&rows))
}

fn export_intents(
    intents_file: &Path,
    entities_file: &Path,
    project_id: &str,
    out_dir: &Path,
) -> anyhow::Result<usize> {
    let dict = load_dictionary(entities_file)?;
    let intent_rows = convotrain_ingest::read_rows(intents_file)?;
    let groups = group_phrases(&intent_rows, INTENT_COLUMN, TEXT_COLUMN);

    let mut gateway = JsonExportGateway::new(out_dir)?;
    let mut budget = CallBudget::default();
    let mut count = 0;

    for (name, phrases) in groups {
        let record = assemble(name, &phrases, &dict);
        let intent = Intent::from_record(&record);
        gateway.create_intent(project_id, &intent)?;
        count += 1;

        if let Some(pause) = budget.record_call() {
            tracing::info!(seconds = pause.as_secs(), "batch exhausted, pause due before further remote calls");
        }
    }

    Ok(count)
}

fn export_entities(
    entities_file: &Path,
    project_id: &str,
    out_dir: &Path,
) -> anyhow::Result<usize> {
    let dict = load_dictionary(entities_file)?;
    let entity_types = EntityType::from_dictionary(&dict);

    let mut gateway = JsonExportGateway::new(out_dir)?;
    let mut budget = CallBudget::default();

    for entity_type in &entity_types {
        gateway.create_entity_type(project_id, entity_type)?;

        if let Some(pause) = budget.record_call() {
            tracing::info!(seconds = pause.as_secs(), "batch exhausted, pause due before further remote calls");
        }
    }

    Ok(entity_types.len())
}

fn list_intents(project_id: &str, out_dir: &Path) -> anyhow::Result<Vec<String>> {
    let gateway = JsonExportGateway::new(out_dir)?;
    Ok(gateway.list_intents(project_id)?)
}

fn list_entities(project_id: &str, out_dir: &Path) -> anyhow::Result<Vec<String>> {
    let gateway = JsonExportGateway::new(out_dir)?;
    Ok(gateway.list_entity_types(project_id)?)
}

fn delete_intents(project_id: &str, out_dir: &Path) -> anyhow::Result<usize> {
    let mut gateway = JsonExportGateway::new(out_dir)?;
    let names = gateway.list_intents(project_id)?;
    for name in &names {
        gateway.delete_intent(project_id, name)?;
    }
    Ok(names.len())
}

fn delete_entities(project_id: &str, out_dir: &Path) -> anyhow::Result<usize> {
    let mut gateway = JsonExportGateway::new(out_dir)?;
    let names = gateway.list_entity_types(project_id)?;
    for name in &names {
        gateway.delete_entity_type(project_id, name)?;
    }
    Ok(names.len())
}

fn annotate_phrase(phrase: &str, entities_file: &Path) -> anyhow::Result<()> {
    let dict = load_dictionary(entities_file)?;
    let annotated = annotate(phrase, &dict);

    for segment in annotated.segments() {
        match segment {
            Segment::Literal(text) => println!("  literal    {text:?}"),
            Segment::EntityRef {
                text,
                entity_type,
                alias: _,
            } => println!("  entity     {text:?}  {entity_type}"),
        }
    }

    Ok(())
}
