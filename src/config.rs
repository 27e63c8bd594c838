//! CLI configuration loaded through confy
//!
//! Defaults to `tasks.json` under the platform's documents directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the task file
    pub data_directory: String,
    /// File name of the JSON task document
    pub task_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        let documents = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_directory: documents.to_string_lossy().into_owned(),
            task_filename: "tasks.json".to_string(),
        }
    }
}

impl Config {
    /// Full path of the JSON task document
    pub fn tasks_file(&self) -> PathBuf {
        PathBuf::from(&self.data_directory).join(&self.task_filename)
    }
}
