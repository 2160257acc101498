/// Key-value substrate the appointment collection is persisted into.
pub trait StorageBackend: Clone + Send + Sync + 'static {
    fn is_available(&self) -> bool;
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: String) -> Result<(), String>;
}
