//! Database configuration.

/// Configuration for a [`Database`](crate::Database).
#[derive(Debug, Clone)]
pub struct Config {
    /// File extension of collection and settings files.
    pub file_extension: String,

    /// Id handed out for an empty collection with no reservations.
    pub first_id: u64,

    /// Whether to hold an exclusive lock on the data root while connected.
    pub lock_directory: bool,

    /// Whether operations on unregistered extension kinds fail instead of
    /// reporting "not found".
    pub strict_extensions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extension: "xml".to_string(),
            first_id: 1000,
            lock_directory: true,
            strict_extensions: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file extension (without the leading dot).
    #[must_use]
    pub fn file_extension(mut self, value: impl Into<String>) -> Self {
        self.file_extension = value.into();
        self
    }

    /// Sets the first id of an empty collection.
    #[must_use]
    pub const fn first_id(mut self, value: u64) -> Self {
        self.first_id = value;
        self
    }

    /// Sets whether the data root is locked while connected.
    #[must_use]
    pub const fn lock_directory(mut self, value: bool) -> Self {
        self.lock_directory = value;
        self
    }

    /// Sets strict handling of unregistered extension kinds.
    #[must_use]
    pub const fn strict_extensions(mut self, value: bool) -> Self {
        self.strict_extensions = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.file_extension, "xml");
        assert_eq!(config.first_id, 1000);
        assert!(config.lock_directory);
        assert!(!config.strict_extensions);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .file_extension("officedb")
            .first_id(1)
            .lock_directory(false)
            .strict_extensions(true);

        assert_eq!(config.file_extension, "officedb");
        assert_eq!(config.first_id, 1);
        assert!(!config.lock_directory);
        assert!(config.strict_extensions);
    }
}
