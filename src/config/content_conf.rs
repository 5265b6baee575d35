use std::env;
use std::path::PathBuf;

/// Filesystem location of the MDX "realisation" content store.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub realisations_dir: PathBuf,
}

impl ContentConfig {
    pub fn from_env() -> Self {
        let realisations_dir = env::var("REALISATIONS_DIR")
            .unwrap_or_else(|_| "content/realisations".to_string());
        ContentConfig { realisations_dir: PathBuf::from(realisations_dir) }
    }
}
