use actix_web::{http::header, post, web, HttpRequest, HttpResponse};

use crate::{
    entities::resume::{ResumeData, YamlRenderRequest},
    errors::ApiError,
    use_cases::{
        mapper::{resume_to_config, to_yaml_string},
        resume::{attachment_filename, validate_resume, validate_yaml_request},
    },
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Validate, map to YAML, and run the full render. 5/minute per caller.
#[post("/generate")]
pub async fn generate_pdf(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ResumeData>,
) -> Result<HttpResponse, ApiError> {
    let caller = get_client_ip(&req, state.config.trust_x_forwarded_for);
    let decision = state.pdf_limiter.check(&caller);
    if !decision.allowed {
        return Err(ApiError::RateLimited(decision.retry_after_secs));
    }

    let mut resume = body.into_inner();
    validate_resume(&mut resume)?;

    let yaml = render_config(&resume)?;
    let pdf = state.renderer.render_pdf(&yaml).await?;

    tracing::info!(caller = %caller, bytes = pdf.len(), "generated PDF");
    let filename = attachment_filename(resume.display_name(), "pdf");
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(pdf))
}

/// Validate and map, returning the intermediate YAML instead of rendering.
/// Rate limited per caller and by a service-wide hourly ceiling.
#[post("/yaml")]
pub async fn generate_yaml(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ResumeData>,
) -> Result<HttpResponse, ApiError> {
    let caller = get_client_ip(&req, state.config.trust_x_forwarded_for);
    let decision = state.check_yaml_limits(&caller);
    if !decision.allowed {
        return Err(ApiError::RateLimited(decision.retry_after_secs));
    }

    let mut resume = body.into_inner();
    validate_resume(&mut resume)?;

    let yaml = render_config(&resume)?;

    let filename = attachment_filename(resume.display_name(), "yaml");
    Ok(HttpResponse::Ok()
        .content_type("application/x-yaml")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(yaml))
}

/// Render caller-supplied YAML directly, skipping the resume schema.
#[post("/yaml/render")]
pub async fn render_yaml(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<YamlRenderRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = get_client_ip(&req, state.config.trust_x_forwarded_for);
    let decision = state.raw_render_limiter.check(&caller);
    if !decision.allowed {
        return Err(ApiError::RateLimited(decision.retry_after_secs));
    }

    let request = body.into_inner();
    let yaml_content = validate_yaml_request(&request)?;

    let pdf = state.renderer.render_pdf(yaml_content).await?;

    tracing::info!(caller = %caller, bytes = pdf.len(), "rendered raw YAML");
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"resume.pdf\"".to_string(),
        ))
        .body(pdf))
}

fn render_config(resume: &ResumeData) -> Result<String, ApiError> {
    let config = resume_to_config(resume);
    to_yaml_string(&config).map_err(|e| ApiError::Internal(format!("YAML serialization failed: {e}")))
}
