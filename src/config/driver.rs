use super::traits::{invalid, ConfigSection};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};

/// Command templates for the command-line backed driver and text extractor.
///
/// Placeholders: `{url}`, `{key}`, `{x}`, `{y}`, `{path}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub launch: Vec<String>,
    pub key_down: Vec<String>,
    pub key_up: Vec<String>,
    pub click: Vec<String>,
    pub screenshot: Vec<String>,
    pub ocr: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            launch: argv(&["chromium", "--new-window", "--mute-audio", "{url}"]),
            key_down: argv(&["xdotool", "keydown", "{key}"]),
            key_up: argv(&["xdotool", "keyup", "{key}"]),
            click: argv(&["xdotool", "mousemove_relative", "--", "{x}", "{y}", "click", "1"]),
            screenshot: argv(&["import", "-window", "root", "{path}"]),
            ocr: argv(&["tesseract", "{path}", "stdout"]),
        }
    }
}

impl ConfigSection for DriverConfig {
    fn section_name() -> &'static str {
        "driver"
    }

    fn validate(&self) -> Result<(), QwopEvolveError> {
        let templates = [
            ("launch", &self.launch),
            ("key_down", &self.key_down),
            ("key_up", &self.key_up),
            ("click", &self.click),
            ("screenshot", &self.screenshot),
            ("ocr", &self.ocr),
        ];
        for (name, template) in templates {
            if template.first().map_or(true, |program| program.trim().is_empty()) {
                return Err(invalid::<Self>(&format!("{} command must name a program", name)));
            }
        }
        Ok(())
    }
}
