use admission_scheduler::{
    configuration::Configuration, configuration_handler::ConfigurationHandler,
    file_storage::FileStorage, http::create_app, local_storage::MemoryStorage,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#######################");
    println!("# Admission Scheduler #");
    println!("#######################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessible at:\n{}", address.clone());
    let listener = tokio::net::TcpListener::bind(address).await?;

    let app = match configuration.storage_dir() {
        Some(storage_dir) => match FileStorage::new(&storage_dir) {
            Ok(backend) => {
                info!(?storage_dir, "Storing appointments on disk");
                create_app(backend, &configuration)
            }
            Err(err) => {
                error!(?err, ?storage_dir, "Failed to open storage directory. Falling back to in-memory appointments.");
                create_app(MemoryStorage::default(), &configuration)
            }
        },
        None => {
            warn!("No storage directory configured, appointments are kept in memory only");
            create_app(MemoryStorage::default(), &configuration)
        }
    };

    axum::serve(listener, app).await
}
