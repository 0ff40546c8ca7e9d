use std::time::Duration;

/// Hard JSON body cap, rejected by the extractor before deserialization.
pub const MAX_JSON_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// PDF endpoints: 5 requests per minute per caller.
pub const PDF_RATE_LIMIT: u64 = 5;
pub const PDF_RATE_WINDOW: Duration = Duration::from_secs(60);

/// YAML endpoint: 15 per minute per caller, plus a service-wide ceiling of
/// 500 per hour counted under one constant key.
pub const YAML_RATE_LIMIT: u64 = 15;
pub const YAML_RATE_WINDOW: Duration = Duration::from_secs(60);
pub const YAML_GLOBAL_RATE_LIMIT: u64 = 500;
pub const YAML_GLOBAL_RATE_WINDOW: Duration = Duration::from_secs(3600);
pub const GLOBAL_RATE_KEY: &str = "global";
