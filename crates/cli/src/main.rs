use std::sync::Arc;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use medcard_client::{
    ClientError, EmbeddedBackend, HttpBackend, PatientAdapter, PatientForm, PostalLookup,
    RecordBackend, ViaCepLookup,
};
use medcard_core::{
    config::database_path_from_env_value, CoreConfig, PatientRecord, PatientService,
    SqlitePatientStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medcard")]
#[command(about = "MedCard patient record CLI")]
struct Cli {
    /// SQLite database used when no server is given
    #[arg(long, env = "MEDCARD_DB_PATH")]
    db: Option<String>,

    /// Base URL of a MedCard server, e.g. http://localhost:5000
    #[arg(long, env = "MEDCARD_API_URL")]
    server: Option<String>,

    /// Base URL of the postal-code lookup service
    #[arg(long, env = "MEDCARD_POSTAL_LOOKUP_URL", default_value = ViaCepLookup::DEFAULT_BASE_URL)]
    postal_lookup_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients, newest first
    List,
    /// Show one patient
    Get {
        /// Patient id
        id: i64,
    },
    /// Create a patient
    Create(PatientArgs),
    /// Overwrite every field of a patient
    Update {
        /// Patient id
        id: i64,
        #[command(flatten)]
        patient: PatientArgs,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: i64,
    },
    /// Delete every patient in the local database
    Clear,
    /// Look up the address for a postal code (CEP)
    LookupCep {
        /// Postal code, e.g. 01001-000
        cep: String,
    },
}

#[derive(Args)]
struct PatientArgs {
    /// Patient name
    #[arg(long)]
    name: String,
    /// Patient age
    #[arg(long)]
    age: String,
    /// Address; may be left out when --lookup fills it from --postal-code
    #[arg(long, default_value = "")]
    address: String,
    /// Operation performed
    #[arg(long)]
    operation: String,
    /// Postal code (CEP)
    #[arg(long, default_value = "")]
    postal_code: String,
    /// Fill the address from the postal code before saving
    #[arg(long)]
    lookup: bool,
}

impl PatientArgs {
    fn into_form(self) -> (PatientForm, bool) {
        let form = PatientForm {
            name: self.name,
            age: self.age,
            address: self.address,
            postal_code: self.postal_code,
            operation: self.operation,
        };
        (form, self.lookup)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let lookup = ViaCepLookup::new(cli.postal_lookup_url);

    if let Commands::LookupCep { cep } = cli.command {
        return lookup_cep(&lookup, cep).await;
    }

    if let Some(url) = cli.server {
        if matches!(cli.command, Commands::Clear) {
            bail!("clear only works on a local database (omit --server)");
        }
        let mut adapter = PatientAdapter::new(HttpBackend::new(url));
        return run(&mut adapter, &lookup, cli.command).await;
    }

    let cfg = CoreConfig::new(database_path_from_env_value(cli.db))?;
    let store = Arc::new(SqlitePatientStore::open(cfg.database_path())?);
    let service = PatientService::new(store.clone());

    let result = match cli.command {
        Commands::Clear => service
            .delete_all_patients()
            .map(|removed| println!("Deleted {} patients.", removed))
            .map_err(|e| anyhow::anyhow!(ClientError::from(e).user_message())),
        command => {
            let mut adapter = PatientAdapter::new(EmbeddedBackend::new(service));
            run(&mut adapter, &lookup, command).await
        }
    };

    match Arc::try_unwrap(store) {
        Ok(store) => store.close()?,
        Err(_) => tracing::warn!("patient store still shared at exit; dropping it"),
    }

    result
}

async fn run<B: RecordBackend>(
    adapter: &mut PatientAdapter<B>,
    lookup: &ViaCepLookup,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            adapter.refresh().await.map_err(user_error)?;
            print_list(adapter.patients());
        }
        Commands::Get { id } => {
            let patient = adapter.backend().get(id).await.map_err(user_error)?;
            print_patient(&patient);
        }
        Commands::Create(args) => {
            let (mut form, use_lookup) = args.into_form();
            if use_lookup {
                fill_address(adapter, lookup, &mut form).await;
            }
            let patient = adapter.save(None, &form).await.map_err(user_error)?;
            println!("Created patient with ID: {}", patient.id);
            print_list(adapter.patients());
        }
        Commands::Update { id, patient } => {
            let (mut form, use_lookup) = patient.into_form();
            if use_lookup {
                fill_address(adapter, lookup, &mut form).await;
            }
            adapter.save(Some(id), &form).await.map_err(user_error)?;
            println!("Updated patient with ID: {}", id);
            print_list(adapter.patients());
        }
        Commands::Delete { id } => {
            adapter.remove(id).await.map_err(user_error)?;
            println!("Deleted patient with ID: {}", id);
            print_list(adapter.patients());
        }
        Commands::LookupCep { cep } => lookup_cep(lookup, cep).await?,
        Commands::Clear => bail!("clear only works on a local database"),
    }

    if let Some(message) = adapter.error() {
        eprintln!("Warning: {}", message);
    }

    Ok(())
}

/// Print the address for `cep`. Needs no patient store.
async fn lookup_cep(lookup: &ViaCepLookup, cep: String) -> anyhow::Result<()> {
    match lookup.lookup(&cep).await.map_err(user_error)? {
        Some(address) => println!("{}", address.to_address_line()),
        None => bail!(ClientError::PostalCodeNotFound(cep).user_message()),
    }
    Ok(())
}

/// Best-effort address enrichment: a failed lookup is reported and the save goes ahead.
async fn fill_address<B: RecordBackend>(
    adapter: &mut PatientAdapter<B>,
    lookup: &ViaCepLookup,
    form: &mut PatientForm,
) {
    if let Err(e) = adapter.fill_address(lookup, form).await {
        eprintln!("Warning: {}", e.user_message());
    }
}

fn user_error(err: ClientError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

fn print_list(patients: &[PatientRecord]) {
    if patients.is_empty() {
        println!("No patients found.");
        return;
    }
    for patient in patients {
        print_patient(patient);
    }
}

fn print_patient(patient: &PatientRecord) {
    println!(
        "ID: {}, Name: {}, Age: {}, Address: {}, Postal code: {}, Operation: {}, Created: {}",
        patient.id,
        patient.name,
        patient.age,
        patient.address,
        patient.postal_code.as_deref().unwrap_or("-"),
        patient.operation,
        patient.created_at.to_rfc3339()
    );
}
