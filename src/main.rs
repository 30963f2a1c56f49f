use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storedesk::auth::RegisterRequest;
use storedesk::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storedesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Cli { global, command } = Cli::parse();

    match command {
        Commands::Init => commands::init().await,
        Commands::Login { email, password } => commands::login(&global, &email, password).await,
        Commands::Register {
            name,
            email,
            role,
            phone,
            store_name,
            gst_number,
            password,
        } => {
            let account = RegisterRequest {
                name,
                email,
                password: password.unwrap_or_default(),
                role,
                phone,
                store_name,
                gst_number,
            };
            commands::register(&global, account).await
        }
        Commands::Logout => commands::logout(&global).await,
        Commands::Whoami => commands::whoami(&global).await,
        Commands::Open { path, format } => commands::open(&global, &path, format).await,
        Commands::Routes { role } => commands::routes(role).await,
        Commands::Dashboard => commands::dashboard(&global).await,
        Commands::List { resource, format } => commands::list(&global, resource, format).await,
        Commands::Get {
            resource,
            id,
            format,
        } => commands::get(&global, resource, &id, format).await,
        Commands::Create { resource, data } => commands::create(&global, resource, &data).await,
        Commands::Update { resource, id, data } => {
            commands::update(&global, resource, &id, &data).await
        }
        Commands::Delete {
            resource,
            id,
            force,
        } => commands::delete(&global, resource, &id, force).await,
        Commands::Users { role, format } => commands::users(&global, role, format).await,
        Commands::Order { action } => commands::order(&global, action).await,
        Commands::Refund { action } => commands::refund(&global, action).await,
        Commands::Cart { action } => commands::cart(&global, action).await,
        Commands::Shop { action } => commands::shop(&global, action).await,
        Commands::Watch => commands::watch(&global).await,
    }
}
