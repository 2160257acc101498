use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn storage_dir(&self) -> Option<PathBuf>;
    fn seed_examples(&self) -> bool;
}
