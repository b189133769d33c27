/// Persistence seam for the save slot. The engine never talks to the store
/// directly; the host owns a repository and decides when to read or write.
pub trait SaveRepository {
    fn load_save(&mut self) -> Result<Option<String>, Box<dyn std::error::Error>>;
    fn write_save(
        &mut self,
        payload: &str,
        saved_at_ms: f64,
    ) -> Result<(), Box<dyn std::error::Error>>;
    fn clear_save(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
