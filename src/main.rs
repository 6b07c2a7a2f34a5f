use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use dancedesk_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{LlmService, MailthreadService, PlacesService, StripeService},
    handlers,
    middlewares::{AuthMiddleware, CapabilityGuard, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.jwt.secret);

    let stripe_service = StripeService::new(config.stripe.clone());
    let mailthread_service = MailthreadService::new(config.mailthread.clone());
    let places_service = PlacesService::new(config.places.clone());
    let llm_service = LlmService::new(config.llm.clone());

    let auth_service = AuthService::new(pool.clone());
    let student_service = StudentService::new(pool.clone());
    let class_service = ClassService::new(pool.clone());
    let note_service = NoteService::new(pool.clone(), llm_service.clone());
    let payment_service = PaymentService::new(pool.clone());
    let lesson_pack_service = LessonPackService::new(pool.clone(), stripe_service.clone());
    let lesson_request_service = LessonRequestService::new(pool.clone());
    let waiver_service = WaiverService::new(pool.clone());
    let studio_service = StudioService::new(
        pool.clone(),
        mailthread_service.clone(),
        places_service.clone(),
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            // capability check runs after auth has resolved the profile
            .wrap(CapabilityGuard)
            .wrap(AuthMiddleware::new(jwt_service.clone(), pool.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(student_service.clone()))
            .app_data(web::Data::new(class_service.clone()))
            .app_data(web::Data::new(note_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(lesson_pack_service.clone()))
            .app_data(web::Data::new(lesson_request_service.clone()))
            .app_data(web::Data::new(waiver_service.clone()))
            .app_data(web::Data::new(studio_service.clone()))
            .app_data(web::Data::new(stripe_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::students_config)
                    .configure(handlers::classes_config)
                    .configure(handlers::notes_config)
                    .configure(handlers::payments_config)
                    .configure(handlers::lesson_packs_config)
                    .configure(handlers::lesson_requests_config)
                    .configure(handlers::waivers_config)
                    .configure(handlers::studios_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
