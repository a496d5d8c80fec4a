use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;

use crate::auth::TokenAuthority;
use crate::routes::{
    get_users, health_check, refresh, sign_in_email, sign_in_login, sign_out, sign_up, validate,
};

pub fn run(listener: TcpListener, authority: TokenAuthority) -> Result<Server, std::io::Error> {
    let authority = web::Data::new(authority);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(authority.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/users", web::get().to(get_users))
            .route("/sign-up", web::post().to(sign_up))
            .route("/sign-in-email", web::post().to(sign_in_email))
            .route("/sign-in-login", web::post().to(sign_in_login))
            .route("/refresh", web::post().to(refresh))
            .route("/sign-out", web::post().to(sign_out))
            .route("/validate", web::post().to(validate))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
