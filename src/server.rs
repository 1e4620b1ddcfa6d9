use actix_cors::Cors;
use actix_web::{error::JsonPayloadError, middleware, web, App, HttpRequest, HttpServer};

use crate::{
    config::Config,
    error::RelayError,
    models::{SolveRequest, SolveResult},
    relay::SolveRelay,
};

pub const SOLVE_PATH: &str = "/api/solve";

async fn solve(
    relay: web::Data<SolveRelay>,
    body: web::Json<SolveRequest>,
) -> Result<web::Json<SolveResult>, RelayError> {
    let result = relay.solve(body.into_inner()).await.map_err(|e| {
        log::error!("Solve failed: {}", e);
        e
    })?;
    Ok(web::Json(result))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let relay_error = match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            RelayError::PayloadTooLarge(err.to_string())
        }
        other => RelayError::InvalidPayload(other.to_string()),
    };
    log::warn!("Rejected request body: {}", relay_error);
    relay_error.into()
}

/// Registers the solve route and the JSON body rules.
pub fn configure(json_body_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(json_body_limit)
                .error_handler(json_error),
        )
        .service(web::resource(SOLVE_PATH).route(web::post().to(solve)));
    }
}

/// Any origin, method and request header; answers preflights on every path.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
}

pub async fn run(config: Config, relay: SolveRelay) -> std::io::Result<()> {
    let relay = web::Data::new(relay);
    let json_body_limit = config.json_body_limit;
    let address = config.bind_address();

    log::info!("🌐 Binding {}", address);

    HttpServer::new(move || {
        App::new()
            .app_data(relay.clone())
            .wrap(cors())
            .wrap(middleware::Logger::new("%r %s %Dms"))
            .configure(configure(json_body_limit))
    })
    .bind(&address)?
    .run()
    .await
}
