//! Configuration access port trait.

/// Raw key lookup. Typing and range checks live in `domain::config_validation`.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
