//! Site-wide theme selection.

use std::sync::RwLock;

/// Known themes and the one currently active for the whole site.
pub struct ThemeRegistry {
    known: Vec<String>,
    current: RwLock<String>,
}

impl ThemeRegistry {
    /// Create a registry; `default` is added to the known themes if absent.
    pub fn new<I, S>(known: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let default = default.into();
        let mut known: Vec<String> = known.into_iter().map(Into::into).collect();
        if !known.contains(&default) {
            known.push(default.clone());
        }
        Self {
            known,
            current: RwLock::new(default),
        }
    }

    /// Currently active theme
    pub fn current(&self) -> String {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_known(&self, theme: &str) -> bool {
        self.known.iter().any(|known| known == theme)
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }

    /// Switch the active theme. Returns false and keeps the current theme
    /// when the name is unknown.
    pub fn set_current(&self, theme: &str) -> bool {
        if !self.is_known(theme) {
            tracing::warn!(theme = %theme, "Ignoring switch to unknown theme");
            return false;
        }

        let mut current = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = theme.to_string();
        tracing::info!(theme = %theme, "Default theme changed");
        true
    }
}

/// Request extension carrying the theme chosen for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTheme(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_to_known_theme() {
        let themes = ThemeRegistry::new(["default", "compact"], "default");

        assert!(themes.set_current("compact"));
        assert_eq!(themes.current(), "compact");
    }

    #[test]
    fn test_unknown_theme_is_ignored() {
        let themes = ThemeRegistry::new(["default"], "default");

        assert!(!themes.set_current("neon"));
        assert_eq!(themes.current(), "default");
    }

    #[test]
    fn test_default_is_always_known() {
        let themes = ThemeRegistry::new(Vec::<String>::new(), "plain");
        assert!(themes.is_known("plain"));
        assert_eq!(themes.known().len(), 1);
    }
}
