//! Catalog records
//!
//! Both record types are built once by the markup extractor and never
//! mutated afterwards. A candidate list is a plain `Vec` whose index is the
//! only identity the selection round uses.

/// A cataloged tune as listed on a search or popular page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune {
    /// Display name
    pub name: String,
    /// Catalog identifier, treated as an opaque token
    pub id: String,
    /// Short category label (reel, jig, hornpipe, ...)
    pub tune_type: String,
}

impl Tune {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        tune_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            tune_type: tune_type.into(),
        }
    }
}

/// One notated variant of a tune
///
/// `id`, `meter` and `key` are read from the `X:`, `M:` and `K:` header
/// lines of the notation block. They are a view over `notation`, which
/// still holds every non-empty line of the block, headers included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuneSetting {
    /// Reference number from the `X:` line
    pub id: Option<String>,
    /// Meter from the `M:` line
    pub meter: Option<String>,
    /// Key from the `K:` line
    pub key: Option<String>,
    /// Full notation text, lines joined by `\n`
    pub notation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tune_new_accepts_str_and_string() {
        let tune = Tune::new("Cooley's", String::from("50"), "reel");
        assert_eq!(tune.name, "Cooley's");
        assert_eq!(tune.id, "50");
        assert_eq!(tune.tune_type, "reel");
    }

    #[test]
    fn test_setting_default_has_absent_fields() {
        let setting = TuneSetting::default();
        assert!(setting.id.is_none());
        assert!(setting.meter.is_none());
        assert!(setting.key.is_none());
        assert!(setting.notation.is_empty());
    }
}
