use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::{App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use quizhost::handlers;
use quizhost::middlewares::jwt::Jwt;
use quizhost::uploader::ImageHostClient;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = dotenv::var("DATABASE_URL")?;
    let secret = dotenv::var(handlers::JWT_SECRET)?.into_bytes();
    let address = dotenv::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_owned());
    let image_host_url = dotenv::var("IMAGE_HOST_URL")?;
    let image_host_key = dotenv::var("IMAGE_HOST_API_KEY")?;

    let pool = PgPoolOptions::new().max_connections(5).connect(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(ImageHostClient::new(image_host_url.clone(), image_host_key.clone())))
            .service(
                scope("auth")
                    .service(resource("register").route(post().to(handlers::register)))
                    .service(resource("login").route(post().to(handlers::login))),
            )
            .service(
                scope("user")
                    .wrap(Jwt::new(secret.clone()))
                    .route("statistics", get().to(handlers::user::statistics)),
            )
            .service(
                scope("category")
                    .route("", post().to(handlers::category::create))
                    .route("", get().to(handlers::category::list))
                    .route("{category_id}/quiz", get().to(handlers::category::quizzes)),
            )
            .service(
                scope("quiz")
                    .service(
                        resource("")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::quiz::create::<ImageHostClient>))
                            .route(get().to(handlers::quiz::list)),
                    )
                    .service(
                        resource("{quiz_id}/rated")
                            .wrap(Jwt::new(secret.clone()))
                            .route(get().to(handlers::quiz::rated)),
                    )
                    .route("{quiz_id}/question", get().to(handlers::quiz::questions))
                    .route("{quiz_id}/rating", get().to(handlers::quiz::ratings))
                    .route("{quiz_id}", get().to(handlers::quiz::retrieve)),
            )
            .service(
                scope("question")
                    .service(
                        resource("buttons")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_buttons::<ImageHostClient>)),
                    )
                    .service(
                        resource("buttons/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_buttons::<ImageHostClient>)),
                    )
                    .service(
                        resource("checkboxes")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_checkboxes::<ImageHostClient>)),
                    )
                    .service(
                        resource("checkboxes/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_checkboxes::<ImageHostClient>)),
                    )
                    .service(
                        resource("range")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_range::<ImageHostClient>)),
                    )
                    .service(
                        resource("range/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_range::<ImageHostClient>)),
                    )
                    .service(
                        resource("reorder")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_reorder::<ImageHostClient>)),
                    )
                    .service(
                        resource("reorder/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_reorder::<ImageHostClient>)),
                    )
                    .service(
                        resource("location")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_location::<ImageHostClient>)),
                    )
                    .service(
                        resource("location/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_location::<ImageHostClient>)),
                    )
                    .service(
                        resource("typeanswer")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::question::create_type_answer::<ImageHostClient>)),
                    )
                    .service(
                        resource("typeanswer/{question_id}")
                            .wrap(Jwt::new(secret.clone()))
                            .route(put().to(handlers::question::update_type_answer::<ImageHostClient>)),
                    )
                    .service(
                        resource("{question_id}")
                            .route(get().to(handlers::question::retrieve))
                            .route(delete().to(handlers::question::remove).wrap(Jwt::new(secret.clone()))),
                    ),
            )
            .service(
                scope("match")
                    .service(resource("").wrap(Jwt::new(secret.clone())).route(post().to(handlers::matches::create)))
                    .service(
                        resource("{match_id}/result")
                            .wrap(Jwt::new(secret.clone()))
                            .route(post().to(handlers::matches::submit_result)),
                    )
                    .service(
                        resource("{match_id}")
                            .route(get().to(handlers::matches::get_match))
                            .route(put().to(handlers::matches::update_match)),
                    ),
            )
            .service(scope("rating").service(resource("").wrap(Jwt::new(secret.clone())).route(post().to(handlers::rating::create))))
    })
    .bind(&address)?
    .run()
    .await?;
    Ok(())
}
