//! Localization provider.
//!
//! Resource strings are loaded from `<culture>.json` files, each a flat
//! object mapping keys to format strings with positional `{0}`, `{1}`
//! placeholders.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"));

/// A language tag such as `en-US` or `zh`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Culture(String);

impl Culture {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Neutral parent culture (`zh` for `zh-CN`), if any.
    pub fn parent(&self) -> Option<Culture> {
        self.0
            .split_once(['-', '_'])
            .map(|(language, _)| Culture::new(language))
    }

    /// First language tag of an `Accept-Language` header value.
    pub fn from_accept_language(header: &str) -> Option<Culture> {
        header
            .split(',')
            .map(|part| part.split(';').next().unwrap_or("").trim())
            .find(|tag| !tag.is_empty() && *tag != "*")
            .map(Culture::new)
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Localization provider trait.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Localizer: Send + Sync {
    /// Look up `key` for `culture` and apply positional `args`.
    fn get_string(&self, key: &str, culture: &Culture, args: &[String]) -> String;
}

/// Localizer backed by JSON resource dictionaries.
///
/// Lookup order: exact culture, neutral parent culture, default culture,
/// then the key itself.
pub struct ResourceLocalizer {
    resources: HashMap<String, HashMap<String, String>>,
    default_culture: Culture,
}

impl ResourceLocalizer {
    /// Build from in-memory dictionaries keyed by culture tag.
    pub fn new(
        resources: HashMap<String, HashMap<String, String>>,
        default_culture: Culture,
    ) -> Self {
        let resources = resources
            .into_iter()
            .map(|(culture, strings)| (culture.to_ascii_lowercase(), strings))
            .collect();
        Self {
            resources,
            default_culture,
        }
    }

    /// Load every `*.json` file in `dir`; the file stem is the culture tag.
    pub fn load(dir: impl AsRef<Path>, default_culture: Culture) -> AppResult<Self> {
        let dir = dir.as_ref();
        let mut resources = HashMap::new();

        let entries = fs::read_dir(dir).map_err(|e| {
            AppError::internal(format!("Failed to read locales from {}: {}", dir.display(), e))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| AppError::internal(format!("Failed to list locales: {}", e)))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(culture) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let raw = fs::read_to_string(&path).map_err(|e| {
                AppError::internal(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let strings: HashMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
                AppError::internal(format!("Invalid resource file {}: {}", path.display(), e))
            })?;

            tracing::debug!(culture = %culture, count = strings.len(), "Loaded resource strings");
            resources.insert(culture.to_string(), strings);
        }

        Ok(Self::new(resources, default_culture))
    }

    /// Cultures with a loaded dictionary
    pub fn cultures(&self) -> Vec<&str> {
        let mut cultures: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        cultures.sort_unstable();
        cultures
    }

    fn lookup(&self, key: &str, culture: &Culture) -> Option<&str> {
        let candidates = [
            Some(culture.clone()),
            culture.parent(),
            Some(self.default_culture.clone()),
            self.default_culture.parent(),
        ];

        candidates.into_iter().flatten().find_map(|candidate| {
            self.resources
                .get(&candidate.as_str().to_ascii_lowercase())
                .and_then(|strings| strings.get(key))
                .map(String::as_str)
        })
    }
}

impl Localizer for ResourceLocalizer {
    fn get_string(&self, key: &str, culture: &Culture, args: &[String]) -> String {
        match self.lookup(key, culture) {
            Some(template) => format_positional(template, args),
            None => {
                tracing::debug!(key = %key, culture = %culture, "Missing resource string");
                format_positional(key, args)
            }
        }
    }
}

/// Replace `{n}` with the n-th argument; out-of-range placeholders stay.
pub fn format_positional(template: &str, args: &[String]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn localizer() -> ResourceLocalizer {
        let mut resources = HashMap::new();
        resources.insert(
            "en-US".to_string(),
            HashMap::from([
                ("greeting".to_string(), "Hello, {0}!".to_string()),
                ("farewell".to_string(), "Goodbye".to_string()),
            ]),
        );
        resources.insert(
            "zh".to_string(),
            HashMap::from([("greeting".to_string(), "你好，{0}！".to_string())]),
        );
        ResourceLocalizer::new(resources, Culture::new("en-US"))
    }

    #[test]
    fn test_exact_culture_with_args() {
        let text = localizer().get_string("greeting", &Culture::new("en-US"), &["Ana".into()]);
        assert_eq!(text, "Hello, Ana!");
    }

    #[test]
    fn test_parent_culture_fallback() {
        let text = localizer().get_string("greeting", &Culture::new("zh-CN"), &["Li".into()]);
        assert_eq!(text, "你好，Li！");
    }

    #[test]
    fn test_default_culture_fallback() {
        let text = localizer().get_string("farewell", &Culture::new("zh-CN"), &[]);
        assert_eq!(text, "Goodbye");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let text = localizer().get_string("nope", &Culture::new("fr"), &[]);
        assert_eq!(text, "nope");
    }

    #[test]
    fn test_format_positional_leaves_unknown_placeholders() {
        let text = format_positional("{0} of {1} ({2})", &["1".into(), "3".into()]);
        assert_eq!(text, "1 of 3 ({2})");
    }

    #[test]
    fn test_culture_from_accept_language() {
        let culture = Culture::from_accept_language("zh-CN,zh;q=0.9,en;q=0.8").unwrap();
        assert_eq!(culture.as_str(), "zh-CN");
        assert_eq!(culture.parent(), Some(Culture::new("zh")));
        assert!(Culture::from_accept_language("*").is_none());
        assert!(Culture::new("en").parent().is_none());
    }
}
