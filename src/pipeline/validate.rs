// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;
use crate::utils::console;

/// Validate the configuration and show the values that matter most.
pub fn run_validate(config: &Config) -> Result<()> {
    console::header("Validating configuration");

    match config.validate() {
        Ok(()) => {
            log::info!("Config OK");
            console::sub_item(&format!("Endpoint: {}", config.feed.base_url));
            console::sub_item(&format!("Timeout: {}s", config.feed.timeout_secs));
            console::sub_item(&format!("Request delay: {}ms", config.feed.request_delay_ms));
            console::sub_item(&format!(
                "Room range: {} ({} IDs)",
                config.ranges.rooms,
                config.ranges.rooms.len()
            ));
            console::sub_item(&format!(
                "Group range: {} ({} IDs)",
                config.ranges.groups,
                config.ranges.groups.len()
            ));
            console::sub_item(&format!(
                "Storage: {}",
                config.paths.storage_dir.display()
            ));
            Ok(())
        }
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}
