use freight_core::{RouteSource, RouteTable};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileRoutesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parsing error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Route table stored as JSON on disk, same schema as the built-in one.
#[derive(Debug, Clone)]
pub struct FileRoutes {
    path: PathBuf,
}

impl FileRoutes {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl RouteSource for FileRoutes {
    type Error = FileRoutesError;

    fn load_route_table(&self) -> Result<RouteTable, Self::Error> {
        let path = self.path.display().to_string();
        let json = std::fs::read_to_string(&self.path).map_err(|source| FileRoutesError::Io {
            path: path.clone(),
            source,
        })?;
        RouteTable::from_json(&json).map_err(|source| FileRoutesError::Json { path, source })
    }

    fn describe(&self) -> String {
        format!("route table {}", self.path.display())
    }
}
