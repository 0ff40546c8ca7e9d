use validator::Validate;

use crate::domain::rules;
use crate::entities::resume::{ResumeData, YamlRenderRequest};
use crate::errors::ApiError;

/// Run the full validation pass over a submitted resume: the per-field
/// validators first, then the cross-field StackOverflow check over the
/// social network list. All failures are reported together; the document
/// is normalized in place only when everything passed.
pub fn validate_resume(data: &mut ResumeData) -> Result<(), ApiError> {
    let mut messages = match data.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => rules::friendly_messages(&errors),
    };

    messages.extend(rules::stackoverflow_violations(&data.social_networks));

    if !messages.is_empty() {
        return Err(ApiError::Validation(messages));
    }

    data.normalize();
    Ok(())
}

/// Validate a raw-YAML render request and hand back the content.
pub fn validate_yaml_request(request: &YamlRenderRequest) -> Result<&str, ApiError> {
    if let Err(errors) = request.validate() {
        return Err(ApiError::Validation(rules::friendly_messages(&errors)));
    }
    Ok(request.yaml_content.as_deref().unwrap_or_default())
}

/// `"John Doe"` -> `John_Doe_CV.pdf`
pub fn attachment_filename(name: &str, extension: &str) -> String {
    format!("{}_CV.{extension}", name.replace(' ', "_"))
}
