//! Analysis vault.
//!
//! Single-slot local persistence for the most recent contract analysis.
//! Entries expire after 7 days; an expired or unreadable entry reads as
//! absent and the file is cleared on the next read.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patterns::ContractAnalysis;

/// File name of the vault slot, created next to wherever the tool runs.
pub const VAULT_FILE: &str = ".stagehand_vault.json";

const VAULT_EXPIRY_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("vault serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored analysis with its lifetime bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub id: String,
    pub analysis: ContractAnalysis,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub struct Vault {
    path: PathBuf,
}

impl Vault {
    /// Vault stored at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Vault stored in the given directory under [`VAULT_FILE`].
    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(VAULT_FILE))
    }

    /// Save an analysis, replacing any previous entry.
    pub fn save(&self, analysis: &ContractAnalysis) -> Result<VaultEntry, VaultError> {
        let now = Utc::now();
        let entry = VaultEntry {
            id: analysis.id.clone(),
            analysis: analysis.clone(),
            created_at: now,
            expires_at: now + Duration::days(VAULT_EXPIRY_DAYS),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &entry)?;
        Ok(entry)
    }

    /// Load the stored entry, if present and not expired. Expired entries are
    /// cleared; a corrupt file reads as absent.
    pub fn load(&self) -> Option<VaultEntry> {
        let file = File::open(&self.path).ok()?;
        let reader = BufReader::new(file);
        let entry: VaultEntry = serde_json::from_reader(reader).ok()?;

        if Utc::now() > entry.expires_at {
            self.clear();
            return None;
        }

        Some(entry)
    }

    /// Remove the stored entry. Missing files are fine.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }

    /// Time until the stored entry expires, if one is present.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        let entry = self.load()?;
        let remaining = entry.expires_at - Utc::now();
        Some(remaining.max(Duration::zero()))
    }
}

/// Render a remaining lifetime as "2d 4h", "3h 12m", or "45m".
pub fn format_time_remaining(remaining: Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::ContractCategory;
    use crate::risk::RiskLevel;
    use std::io::Write;

    fn temp_vault(name: &str) -> Vault {
        let path = std::env::temp_dir().join(format!("stagehand-vault-{}.json", name));
        let _ = fs::remove_file(&path);
        Vault::at(path)
    }

    fn sample_analysis(id: &str) -> ContractAnalysis {
        ContractAnalysis {
            id: id.to_string(),
            category: ContractCategory::GeneralVo,
            contract_text: "Artist agrees to the terms set out in this engagement.".to_string(),
            analyzed_at: Utc::now(),
            flags: Vec::new(),
            overall_risk_level: RiskLevel::Safe,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let vault = temp_vault("roundtrip");

        let entry = vault.save(&sample_analysis("a1")).unwrap();
        assert_eq!(entry.id, "a1");

        let loaded = vault.load().unwrap();
        assert_eq!(loaded.id, "a1");
        assert_eq!(loaded.analysis.category, ContractCategory::GeneralVo);
        assert_eq!(loaded.analysis.overall_risk_level, RiskLevel::Safe);

        vault.clear();
    }

    #[test]
    fn test_empty_vault_reads_absent() {
        let vault = temp_vault("empty");
        assert!(vault.load().is_none());
        assert!(vault.time_until_expiry().is_none());
    }

    #[test]
    fn test_save_replaces_previous_entry() {
        let vault = temp_vault("replace");

        vault.save(&sample_analysis("first")).unwrap();
        vault.save(&sample_analysis("second")).unwrap();

        let loaded = vault.load().unwrap();
        assert_eq!(loaded.id, "second");

        vault.clear();
    }

    #[test]
    fn test_expired_entry_reads_absent_and_clears() {
        let vault = temp_vault("expired");

        let mut entry = vault.save(&sample_analysis("old")).unwrap();
        entry.expires_at = Utc::now() - Duration::hours(1);
        let file = File::create(std::env::temp_dir().join("stagehand-vault-expired.json")).unwrap();
        serde_json::to_writer(BufWriter::new(file), &entry).unwrap();

        assert!(vault.load().is_none());
        // The read also cleared the slot on disk.
        assert!(!std::env::temp_dir()
            .join("stagehand-vault-expired.json")
            .exists());
    }

    #[test]
    fn test_corrupt_vault_reads_absent() {
        let path = std::env::temp_dir().join("stagehand-vault-corrupt.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();

        let vault = Vault::at(&path);
        assert!(vault.load().is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let vault = temp_vault("window");
        let entry = vault.save(&sample_analysis("w")).unwrap();

        let lifetime = entry.expires_at - entry.created_at;
        assert_eq!(lifetime.num_days(), 7);

        let remaining = vault.time_until_expiry().unwrap();
        assert!(remaining.num_days() >= 6);
        assert!(remaining <= Duration::days(7));

        vault.clear();
    }

    #[test]
    fn test_format_time_remaining() {
        assert_eq!(
            format_time_remaining(Duration::days(2) + Duration::hours(4)),
            "2d 4h"
        );
        assert_eq!(
            format_time_remaining(Duration::hours(3) + Duration::minutes(12)),
            "3h 12m"
        );
        assert_eq!(format_time_remaining(Duration::minutes(45)), "45m");
        assert_eq!(format_time_remaining(Duration::zero()), "0m");
    }
}
