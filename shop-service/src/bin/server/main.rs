use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use shop_service::config::BootstrapAdminConfig;
use shop_service::config::Config;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::user::models::CreateUserCommand;
use shop_service::domain::user::models::EmailAddress;
use shop_service::domain::user::models::Password;
use shop_service::domain::user::models::PersonName;
use shop_service::domain::user::models::Role;
use shop_service::domain::user::models::Username;
use shop_service::domain::user::ports::UserServicePort;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;
use shop_service::outbound::repositories::PostgresProductRepository;
use shop_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        lookup_timeout_ms = config.store.lookup_timeout_ms,
        bootstrap_admin = config.bootstrap_admin.is_some(),
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::from_configured_secret(&config.jwt.secret));
    tracing::info!(
        insecure_default = authenticator.uses_insecure_default(),
        "Session signing key loaded"
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let product_repository = Arc::new(PostgresProductRepository::new(pg_pool));

    let user_service = Arc::new(
        UserService::new(user_repository, Arc::clone(&authenticator))
            .with_lookup_timeout(Duration::from_millis(config.store.lookup_timeout_ms)),
    );
    let product_service = Arc::new(ProductService::new(product_repository));

    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_admin(user_service.as_ref(), admin).await?;
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, product_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}

/// Create the configured admin account unless its username is taken.
async fn bootstrap_admin(
    user_service: &dyn UserServicePort,
    admin: &BootstrapAdminConfig,
) -> Result<(), anyhow::Error> {
    let command = CreateUserCommand {
        username: Username::new(admin.username.clone())?,
        email: EmailAddress::new(admin.email.clone())?,
        password: Password::new(admin.password.clone())?,
        first_name: admin.first_name.clone().map(PersonName::new).transpose()?,
        last_name: None,
        role: Role::Admin,
    };

    match user_service.ensure_admin(command).await? {
        Some(user) => tracing::info!(user_id = %user.id, "Bootstrap admin created"),
        None => tracing::info!(
            username = %admin.username,
            "Bootstrap admin already present"
        ),
    }

    Ok(())
}
