//! `ontoedit` command line.
//!
//! Every editing command loads the ontology document, applies one operation
//! and writes the document back.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::{
    config::Config,
    gazetteer::{self, Gazetteer, GeoNamesClient, PlaceMap},
    ingest::read_entities,
    logger,
    ontology::{Iri, OntologyStore},
    Error, Result,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build OWL ontologies from lists and gazetteer data", long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, default_value = "config/ontoedit.yaml")]
    config: PathBuf,

    /// Namespace for minted identifiers, overrides the configuration
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    /// Ontology document, overrides the configuration
    #[arg(short, long, global = true)]
    ontology: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty ontology document
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },
    /// Print entity counts
    Summary,
    /// Add labelled subclasses under a parent class
    AddSubclasses {
        /// Parent class IRI (`http://www.w3.org/2002/07/owl#Thing` for roots)
        parent: Iri,
        /// Class names
        names: Vec<String>,
        /// Read additional names from a file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Add labelled individuals, optionally typed
    AddIndividuals {
        /// Names of the individuals
        names: Vec<String>,
        /// Class IRI the individuals are instances of
        #[arg(long = "type")]
        class: Option<Iri>,
        /// Read additional names from a file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// List every subclass of a class
    Subclasses { class: Iri },
    /// List the direct superclasses of a class
    Superclasses { class: Iri },
    /// Find classes whose label contains the given text
    Search { label: String },
    /// Fetch places from the gazetteer
    Gazetteer {
        #[command(subcommand)]
        command: GazetteerCommands,
    },
}

#[derive(Subcommand, Debug)]
enum GazetteerCommands {
    /// Administrative divisions below a place
    Children {
        /// Gazetteer id of the parent place
        parent_id: u64,
        /// Administrative level (`ADM{level}`)
        #[arg(long, default_value_t = 1)]
        level: u8,
        #[command(flatten)]
        output: PlaceOutput,
    },
    /// Resolve `City, State` lines to place ids
    Cities {
        /// File with one `City, State` pair per line
        file: PathBuf,
        #[command(flatten)]
        output: PlaceOutput,
    },
}

#[derive(clap::Args, Debug)]
struct PlaceOutput {
    /// Save the id -> name table as JSON
    #[arg(long)]
    lookup: Option<PathBuf>,
    /// Import the places into the ontology as individuals
    #[arg(long)]
    import: bool,
    /// Class IRI imported places are typed with
    #[arg(long = "type", requires = "import")]
    class: Option<Iri>,
}

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns the error of the failed operation.
pub async fn main() -> Result<()> {
    run(Cli::parse()).await
}

/// Runs an already parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    logger::init(&config.logger)?;
    let path = cli.ontology.clone().unwrap_or_else(|| config.ontology.path.clone());
    let namespace = config.ontology.namespace.as_str();

    match cli.command {
        Commands::Init { force } => {
            if path.exists() && !force {
                return Err(Error::Config(format!(
                    "`{}` already exists; pass --force to overwrite it",
                    path.display()
                )));
            }
            let store = OntologyStore::create(namespace)?;
            store.save(&path)?;
            println!("{}", store.iri());
        }
        Commands::Summary => {
            let summary = OntologyStore::open(&path, namespace)?.summary();
            println!("ontology: {}", summary.iri);
            println!("classes: {}", summary.class_count);
            println!("individuals: {}", summary.individual_count);
            println!("object properties: {}", summary.object_property_count);
            println!("data properties: {}", summary.data_property_count);
            println!("triples: {}", summary.triple_count);
        }
        Commands::AddSubclasses {
            parent,
            names,
            from_file,
        } => {
            let names = collect_names(names, from_file.as_deref())?;
            let mut store = OntologyStore::open(&path, namespace)?;
            let added = store.taxonomy().add_sub_classes(&parent, &names)?;
            store.save(&path)?;
            print_pairs(&names, &added);
        }
        Commands::AddIndividuals {
            names,
            class,
            from_file,
        } => {
            let names = collect_names(names, from_file.as_deref())?;
            let mut store = OntologyStore::open(&path, namespace)?;
            let added = match &class {
                Some(class) => store
                    .individuals_builder()
                    .add_typed_individuals(class, &names)?,
                None => store.individuals_builder().add_individuals(&names)?,
            };
            store.save(&path)?;
            print_pairs(&names, &added);
        }
        Commands::Subclasses { class } => {
            let store = OntologyStore::open(&path, namespace)?;
            for iri in store.query().sub_classes(&class)? {
                println!("{iri}");
            }
        }
        Commands::Superclasses { class } => {
            let store = OntologyStore::open(&path, namespace)?;
            for iri in store.query().super_classes(&class)? {
                println!("{iri}");
            }
        }
        Commands::Search { label } => {
            let store = OntologyStore::open(&path, namespace)?;
            for iri in store.query().classes_by_label(&label) {
                println!("{iri}\t{}", store.labels(&iri).join(" / "));
            }
        }
        Commands::Gazetteer { command } => {
            let client = GeoNamesClient::try_new(&config.gazetteer)?;
            let gazetteer = Gazetteer::new(client);
            let (places, output) = match command {
                GazetteerCommands::Children {
                    parent_id,
                    level,
                    output,
                } => {
                    let places = gazetteer
                        .admin_divisions(parent_id, level, &config.gazetteer.output_dir)
                        .await?;
                    (places, output)
                }
                GazetteerCommands::Cities { file, output } => {
                    let pairs = read_entities(&file, "", "")?;
                    (gazetteer.city_ids(&pairs).await?, output)
                }
            };
            store_places(&places, &output, &path, namespace)?;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        Config::from_path(&cli.config)?
    } else if let Some(namespace) = &cli.namespace {
        Config::for_namespace(namespace.clone())
    } else {
        return Err(Error::Config(format!(
            "`{}` not found; pass --namespace or --config",
            cli.config.display()
        )));
    };
    if let Some(namespace) = &cli.namespace {
        config.ontology.namespace.clone_from(namespace);
    }
    Ok(config)
}

fn collect_names(mut names: Vec<String>, from_file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(file) = from_file {
        names.extend(read_entities(file, "", "")?);
    }
    Ok(names)
}

fn print_pairs(names: &[String], iris: &[Iri]) {
    for (name, iri) in names.iter().zip(iris) {
        println!("{iri}\t{name}");
    }
}

fn store_places(places: &PlaceMap, output: &PlaceOutput, path: &Path, namespace: &str) -> Result<()> {
    for (id, name) in places {
        println!("{id}\t{name}");
    }
    if let Some(lookup) = &output.lookup {
        gazetteer::write_lookup(lookup, places)?;
    }
    if output.import {
        let mut store = OntologyStore::open(path, namespace)?;
        let imported = gazetteer::import_places(&mut store, places, output.class.as_ref())?;
        store.save(path)?;
        info!(count = imported.len(), path = %path.display(), "gazetteer_places_saved");
    }
    Ok(())
}
