use crate::utils::error::Result;

/// Source of raw reference-table bytes.
pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
}

/// Where the reference tables live and how lookups and checks are tuned.
pub trait ConfigProvider {
    fn standards_path(&self) -> &str;
    fn feeds_path(&self) -> &str;
    fn check_settings(&self) -> crate::core::evaluator::CheckSettings;
    fn match_settings(&self) -> crate::core::resolver::MatchSettings;
}
