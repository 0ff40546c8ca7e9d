mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, rules, use_cases};
pub use interfaces::{handlers, middlewares, routes};
pub use infrastructure::{limiter, renderer, utils};

use constants::{
    GLOBAL_RATE_KEY, PDF_RATE_LIMIT, PDF_RATE_WINDOW, YAML_GLOBAL_RATE_LIMIT,
    YAML_GLOBAL_RATE_WINDOW, YAML_RATE_LIMIT, YAML_RATE_WINDOW,
};
use limiter::rate_limiter::{RateDecision, RateLimiterStore};
use renderer::rendercv::RenderCvInvoker;
use settings::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub renderer: RenderCvInvoker,
    pub pdf_limiter: RateLimiterStore,
    pub raw_render_limiter: RateLimiterStore,
    pub yaml_limiter: RateLimiterStore,
    pub yaml_global_limiter: RateLimiterStore,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        AppState {
            renderer: RenderCvInvoker::new(&config.render_command),
            // Each rendering endpoint gets its own per-caller budget.
            pdf_limiter: RateLimiterStore::new(PDF_RATE_LIMIT, PDF_RATE_WINDOW),
            raw_render_limiter: RateLimiterStore::new(PDF_RATE_LIMIT, PDF_RATE_WINDOW),
            yaml_limiter: RateLimiterStore::new(YAML_RATE_LIMIT, YAML_RATE_WINDOW),
            yaml_global_limiter: RateLimiterStore::new(
                YAML_GLOBAL_RATE_LIMIT,
                YAML_GLOBAL_RATE_WINDOW,
            ),
            config: config.clone(),
        }
    }

    /// Layered check for the YAML endpoint: the global ceiling is consumed
    /// first, then the per-caller window.
    pub fn check_yaml_limits(&self, caller: &str) -> RateDecision {
        let global = self.yaml_global_limiter.check(GLOBAL_RATE_KEY);
        if !global.allowed {
            return global;
        }
        self.yaml_limiter.check(caller)
    }
}
