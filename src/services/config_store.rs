// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub grader: GraderConfig,
    #[serde(default)]
    pub detection: DetectionThresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraderConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Detection and gating thresholds. Tunable configuration; the defaults
/// match the shipped detection behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionThresholds {
    /// Score above which a submission is flagged.
    #[serde(default = "default_flag_score")]
    pub flag_score: f64,
    /// Score above which a flagged submission is rejected outright.
    #[serde(default = "default_reject_score")]
    pub reject_score: f64,
    /// Score below which a clean submission may read "likely original".
    #[serde(default = "default_original_score")]
    pub original_score: f64,
    /// Perplexity below this is a high-confidence AI signal.
    #[serde(default = "default_high_confidence_perplexity")]
    pub high_confidence_perplexity: f64,
    /// Perplexity below this is a medium-confidence AI signal.
    #[serde(default = "default_medium_confidence_perplexity")]
    pub medium_confidence_perplexity: f64,
    /// Perplexity below this still counts as an AI-like pattern.
    #[serde(default = "default_pattern_perplexity")]
    pub pattern_perplexity: f64,
    /// Burstiness at or above this is a secondary AI indicator.
    #[serde(default = "default_burstiness_threshold")]
    pub burstiness_threshold: f64,
    /// Normalization ceiling for perplexity-based scales.
    #[serde(default = "default_max_perplexity")]
    pub max_perplexity: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            flag_score: 20.0,
            reject_score: 50.0,
            original_score: 10.0,
            high_confidence_perplexity: 200.0,
            medium_confidence_perplexity: 500.0,
            pattern_perplexity: 800.0,
            burstiness_threshold: 0.1,
            max_perplexity: 1000.0,
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_max_tokens() -> i32 {
    2048
}
fn default_flag_score() -> f64 {
    20.0
}
fn default_reject_score() -> f64 {
    50.0
}
fn default_original_score() -> f64 {
    10.0
}
fn default_high_confidence_perplexity() -> f64 {
    200.0
}
fn default_medium_confidence_perplexity() -> f64 {
    500.0
}
fn default_pattern_perplexity() -> f64 {
    800.0
}
fn default_burstiness_threshold() -> f64 {
    0.1
}
fn default_max_perplexity() -> f64 {
    1000.0
}

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self {
            config_dir,
            config_file,
        }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gradeguard"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        // Create backup if file exists
        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content).map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Create a backup of current config
    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)?;

        Ok(())
    }

    /// Remove old backups, keeping only the most recent N
    fn cleanup_old_backups(&self, backup_dir: &PathBuf, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        // Sort by modification time (oldest first)
        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        // Remove oldest entries
        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }
}
