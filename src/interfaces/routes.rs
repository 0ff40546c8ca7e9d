use actix_web::web;

use crate::handlers::{resume, system};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health_check)
        .service(resume::generate_pdf)
        .service(resume::generate_yaml)
        .service(resume::render_yaml);
}
