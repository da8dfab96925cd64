use crate::{
    api::{attendance, employee},
    config::Policy,
    db::HrStore,
    error::AppError,
    model::MessageResponse,
};
use actix_web::{
    App, Error, HttpResponse, Responder,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    get,
    middleware::NormalizePath,
    web,
};
use std::sync::Arc;

/// Liveness
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = MessageResponse, example = json!({
            "message": "HRMS Lite API Running"
        }))
    ),
    tag = "Health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new("HRMS Lite API Running"))
}

/// Bodies that fail to parse are rejected with 422 and a `detail` string.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Unprocessable(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(
            web::scope("/employees")
                // /employees
                .service(
                    web::resource("")
                        .route(web::post().to(employee::create_employee))
                        .route(web::get().to(employee::list_employees)),
                )
                // /employees/{id}
                .service(
                    web::resource("/{id}")
                        .route(web::put().to(employee::update_employee))
                        .route(web::delete().to(employee::delete_employee)),
                ),
        )
        .service(
            web::scope("/attendance")
                // /attendance?date=
                .service(
                    web::resource("")
                        .route(web::post().to(attendance::mark_attendance))
                        .route(web::get().to(attendance::list_attendance)),
                )
                // GET takes an employee id, PUT and DELETE an attendance id
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(attendance::employee_attendance))
                        .route(web::put().to(attendance::update_attendance))
                        .route(web::delete().to(attendance::delete_attendance)),
                ),
        );
}

/// Application shared by the server binary and the tests.
pub fn build_app(
    store: Arc<dyn HrStore>,
    policy: Policy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(NormalizePath::trim())
        .app_data(web::Data::from(store))
        .app_data(web::Data::new(policy))
        .app_data(json_config())
        .configure(configure)
}
