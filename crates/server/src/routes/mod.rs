use actix_web::web;

pub mod answer;
pub mod system;

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(answer::answer).service(system::health);
}
