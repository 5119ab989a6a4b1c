//! # Utility Functions
//!
//! Formatting and file helpers shared by the library and the CLI.

use crate::error::VaultResult;

/// Amount formatting utilities
pub mod amount {
    /// Format an amount with thousands separators, e.g. `1,000,000,000 units`
    pub fn format_units(amount: u64) -> String {
        let digits = amount.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("{} units", grouped)
    }
}

/// Time and duration utilities
pub mod time {
    use chrono::DateTime;

    /// Format a unix timestamp for display
    pub fn format_timestamp(timestamp: u64) -> String {
        i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| format!("@{}", timestamp))
    }

    /// Format a duration in seconds in human-readable form
    pub fn format_duration(total_seconds: u64) -> String {
        let days = total_seconds / 86_400;
        let hours = (total_seconds % 86_400) / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if days > 0 {
            format!("{}d {}h {}m", days, hours, minutes)
        } else if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// File system utilities
pub mod fs {
    use super::*;
    use std::fs;
    use std::path::Path;

    /// Ensure the parent directory of `path` exists
    pub fn ensure_parent_exists(path: &Path) -> VaultResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Safe file write with atomic operation
    pub fn write_file_atomic(path: &Path, content: &[u8]) -> VaultResult<()> {
        ensure_parent_exists(path)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(temp_path, path)?;
        Ok(())
    }
}
