use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/certificates", certificate_routes(config))
        .nest("/verify", verify_routes())
        .nest("/admin", admin_routes())
}

fn certificate_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::certificate::create_certificate,
            handlers::certificate::list_certificates
        ))
        .routes(routes!(handlers::certificate::certificate_stats))
        .routes(routes!(handlers::certificate::get_certificate))
        .layer(handlers::certificate::certificate_body_limit(
            config.storage.max_upload_size,
        ))
}

fn verify_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::verify::verify_payload))
        .routes(routes!(handlers::verify::verify_certificate))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::admin::reset_registry))
}
