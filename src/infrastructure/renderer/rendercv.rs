use derive_more::Display;
use tempfile::TempDir;
use tokio::process::Command;

/// Failures from the external renderer, kept distinct so the boundary can
/// tell "the tool failed" apart from "the tool claimed success but left
/// nothing behind".
#[derive(Debug, Display)]
pub enum RenderError {
    #[display("rendercv failed: {_0}")]
    CommandFailed(String),

    #[display("output directory not created. stdout: {stdout}, stderr: {stderr}")]
    MissingOutputDir { stdout: String, stderr: String },

    #[display("no PDF was generated. Files in output: {_0:?}")]
    NoPdfProduced(Vec<String>),

    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

/// Thin wrapper around the rendercv CLI. Each invocation gets its own
/// temporary directory, which is removed when the guard drops on every
/// exit path.
#[derive(Debug, Clone)]
pub struct RenderCvInvoker {
    command: String,
}

impl RenderCvInvoker {
    pub fn new(command: impl Into<String>) -> Self {
        RenderCvInvoker {
            command: command.into(),
        }
    }

    /// Write the configuration to `<tmp>/resume.yaml`, run
    /// `<command> render resume.yaml`, and read back the single PDF from
    /// `<tmp>/rendercv_output`. No timeout and no retries.
    pub async fn render_pdf(&self, yaml_content: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = TempDir::new()?;
        let input_path = workdir.path().join("resume.yaml");
        tokio::fs::write(&input_path, yaml_content).await?;

        tracing::debug!(command = %self.command, "invoking renderer");
        let output = Command::new(&self.command)
            .arg("render")
            .arg(&input_path)
            .current_dir(workdir.path())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let diagnostic = if !stderr.trim().is_empty() {
                stderr
            } else if !stdout.trim().is_empty() {
                stdout
            } else {
                "Unknown error".to_string()
            };
            tracing::warn!(status = ?output.status, "renderer exited with failure");
            return Err(RenderError::CommandFailed(diagnostic));
        }

        let output_dir = workdir.path().join("rendercv_output");
        if !output_dir.is_dir() {
            return Err(RenderError::MissingOutputDir { stdout, stderr });
        }

        let mut found = Vec::new();
        let mut pdf_path = None;
        let mut entries = tokio::fs::read_dir(&output_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if pdf_path.is_none()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
            {
                pdf_path = Some(path.clone());
            }
            found.push(entry.file_name().to_string_lossy().into_owned());
        }

        match pdf_path {
            Some(path) => Ok(tokio::fs::read(&path).await?),
            None => Err(RenderError::NoPdfProduced(found)),
        }
    }
}
