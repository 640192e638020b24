//! Config command - show or change settings.json

use anyhow::{Context, Result};
use cartola_core::config::Config;
use cartola_core::ports::ExportFormat;

use crate::output;

use super::get_cartola_dir;

/// Setting changes requested on the command line
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub fallback_year: Option<i32>,
    pub default_format: Option<ExportFormat>,
    pub sheet_name: Option<String>,
    pub date_format: Option<String>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.fallback_year.is_none()
            && self.default_format.is_none()
            && self.sheet_name.is_none()
            && self.date_format.is_none()
    }

    fn apply(self, config: &mut Config) {
        if let Some(year) = self.fallback_year {
            config.fallback_year = year;
        }
        if let Some(format) = self.default_format {
            config.default_format = format;
        }
        if let Some(name) = self.sheet_name {
            config.sheet_name = name;
        }
        if let Some(format) = self.date_format {
            config.date_format = format;
        }
    }
}

pub fn run(changes: ConfigChanges, json: bool) -> Result<()> {
    let cartola_dir = get_cartola_dir()?;
    let mut config = Config::load(&cartola_dir)?;

    let changed = !changes.is_empty();
    if changed {
        changes.apply(&mut config);
        config
            .save(&cartola_dir)
            .with_context(|| format!("Failed to save settings in {}", cartola_dir.display()))?;
    }

    if json {
        let value = serde_json::json!({
            "fallbackYear": config.fallback_year,
            "defaultFormat": config.default_format,
            "sheetName": config.sheet_name,
            "dateFormat": config.date_format,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if changed {
        output::success(&format!(
            "Saved settings to {}",
            cartola_dir.join("settings.json").display()
        ));
    }

    let mut table = output::create_table();
    table.add_row(vec!["Fallback year".to_string(), config.fallback_year.to_string()]);
    table.add_row(vec!["Default format".to_string(), config.default_format.to_string()]);
    table.add_row(vec!["Sheet name".to_string(), config.sheet_name.clone()]);
    table.add_row(vec!["Date format".to_string(), config.date_format.clone()]);
    println!("{}", table);
    Ok(())
}
