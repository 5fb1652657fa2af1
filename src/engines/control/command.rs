//! Driver and OCR backed by external programs (browser, xdotool, ImageMagick, tesseract).

use super::driver::{CaptureSource, EnvironmentDriver, TextExtractor};
use crate::config::DriverConfig;
use crate::error::{QwopEvolveError, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};

/// Expand `{name}` placeholders in a command template.
fn render(template: &[String], vars: &[(&str, &str)]) -> Result<Command> {
    let mut parts = template.iter().map(|part| {
        vars.iter().fold(part.clone(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    });

    let program = parts
        .next()
        .ok_or_else(|| QwopEvolveError::Configuration("Empty command template".to_string()))?;
    let mut command = Command::new(program);
    command.args(parts);
    Ok(command)
}

fn run(mut command: Command) -> Result<Output> {
    let output = command.stdin(Stdio::null()).output()?;
    if !output.status.success() {
        return Err(QwopEvolveError::Driver(format!(
            "{:?} exited with {}: {}",
            command,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output)
}

/// Drives a desktop browser window through command-line tools.
pub struct CommandDriver {
    config: DriverConfig,
    browser: Option<Child>,
}

impl CommandDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            browser: None,
        }
    }

    fn key(&self, template: &[String], key: char) -> Result<()> {
        let key = key.to_string();
        run(render(template, &[("key", key.as_str())])?)?;
        Ok(())
    }
}

impl CaptureSource for CommandDriver {
    fn capture(&mut self, target: &Path) -> Result<()> {
        let path = target.to_string_lossy();
        run(render(&self.config.screenshot, &[("path", &*path)])?)?;
        Ok(())
    }
}

impl EnvironmentDriver for CommandDriver {
    fn open(&mut self, url: &str) -> Result<()> {
        let mut command = render(&self.config.launch, &[("url", url)])?;
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| QwopEvolveError::Driver(format!("Failed to launch browser: {}", e)))?;
        info!("Launched browser (pid {}) at {}", child.id(), url);
        self.browser = Some(child);
        Ok(())
    }

    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        let (x, y) = (x.to_string(), y.to_string());
        run(render(&self.config.click, &[("x", x.as_str()), ("y", y.as_str())])?)?;
        Ok(())
    }

    fn key_down(&mut self, key: char) -> Result<()> {
        self.key(&self.config.key_down, key)
    }

    fn key_up(&mut self, key: char) -> Result<()> {
        self.key(&self.config.key_up, key)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut child) = self.browser.take() {
            debug!("Stopping browser (pid {})", child.id());
            if let Err(e) = child.kill() {
                warn!("Browser already gone: {}", e);
            }
            child.wait()?;
        }
        Ok(())
    }
}

impl Drop for CommandDriver {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// OCR through the `tesseract` command (or any program printing text to stdout).
pub struct TesseractExtractor {
    command: Vec<String>,
}

impl TesseractExtractor {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl TextExtractor for TesseractExtractor {
    fn extract_text(&self, image: &Path) -> Result<String> {
        let path = image.to_string_lossy();
        let output = run(render(&self.command, &[("path", &*path)])?)
            .map_err(|e| QwopEvolveError::Extraction(e.to_string()))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let command = render(
            &template(&["xdotool", "mousemove_relative", "--", "{x}", "{y}"]),
            &[("x", "100"), ("y", "-20")],
        )
        .unwrap();
        let args: Vec<_> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(command.get_program(), "xdotool");
        assert_eq!(args, vec!["mousemove_relative", "--", "100", "-20"]);
    }

    #[test]
    fn test_render_rejects_empty_template() {
        assert!(render(&[], &[]).is_err());
    }

    #[test]
    fn test_extractor_reads_program_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("screenshot.png");
        std::fs::write(&image, "12.3 met").unwrap();

        let extractor = TesseractExtractor::new(template(&["cat", "{path}"]));
        assert_eq!(extractor.extract_text(&image).unwrap(), "12.3 met");
    }

    #[test]
    fn test_extractor_failure_is_an_extraction_error() {
        let extractor = TesseractExtractor::new(template(&["cat", "{path}"]));
        let err = extractor.extract_text(Path::new("/nonexistent/capture.png")).unwrap_err();
        assert!(matches!(err, QwopEvolveError::Extraction(_)));
    }
}
