use std::sync::Arc;

use booking_notifier::{
    appwrite::{AppwriteClient, ReconnectBackoff},
    notification::{init_notifications, BookingRepository, NotificationDeps},
    routes::create_router,
    session::{SessionService, UserRole},
    state::{AppState, Config},
    theme::ThemeStore,
    ui::PageSurface,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,booking_notifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    if config.jwt.is_some() && config.session.is_none() {
        tracing::warn!("APPWRITE_SESSION is not set, realtime events are limited to public documents");
    }

    let client = Arc::new(AppwriteClient::new(&config));
    let page = PageSurface::new();
    let session = SessionService::new(
        client.clone(),
        client.clone(),
        &config.database_id,
        &config.collections.users,
    );

    let theme_store = ThemeStore::new(&config.theme_file);
    tracing::info!("Theme: {}", theme_store.init_theme().await);

    // Resolve the signed-in user and start their feed
    page.alerts().show_loading(None);
    let notifications = match session.get_current_user().await {
        Some(user) => {
            let role = session.get_user_role(&user.id).await;
            match role.and_then(UserRole::feed_role) {
                Some(feed_role) => Some(init_notifications(
                    &user.id,
                    feed_role,
                    NotificationDeps {
                        bookings: BookingRepository::new(
                            client.clone(),
                            &config.database_id,
                            &config.collections.bookings,
                        ),
                        events: client.clone(),
                        renderer: Arc::new(page.clone()),
                        database_id: config.database_id.clone(),
                        bookings_collection: config.collections.bookings.clone(),
                        reconnect: ReconnectBackoff::default(),
                    },
                )),
                None => {
                    tracing::info!("No booking feed for user {} (role: {:?})", user.id, role);
                    None
                }
            }
        }
        None => {
            tracing::warn!("No active session, notifications disabled");
            None
        }
    };
    page.alerts().hide_loading();

    // Create application state
    let state = AppState {
        config: config.clone(),
        notifications,
        page,
        session,
        theme_store,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
