//! Plugin and theme fingerprint extraction from raw markup

use regex::Regex;
use std::sync::LazyLock;

/// `wp-content/plugins/<slug>` with plain or JSON-escaped slashes
static PLUGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"wp-content(?:\\/|/)plugins(?:\\/|/)([a-zA-Z0-9_-]+)").unwrap()
});

/// `wp-content/themes/<slug>` with plain or JSON-escaped slashes
static THEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"wp-content(?:\\/|/)themes(?:\\/|/)([a-zA-Z0-9_-]+)").unwrap()
});

/// Distinct plugin and theme identifiers, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprints {
    plugins: Vec<String>,
    themes: Vec<String>,
}

impl Fingerprints {
    /// Plugin identifiers
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    /// Theme identifiers
    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    /// Nothing found
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty() && self.themes.is_empty()
    }

    /// Union `other` into `self`, keeping the earlier position of duplicates
    pub fn merge(&mut self, other: Fingerprints) {
        for plugin in other.plugins {
            insert_unique(&mut self.plugins, plugin);
        }
        for theme in other.themes {
            insert_unique(&mut self.themes, theme);
        }
    }

    /// Split into `(plugins, themes)`
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.plugins, self.themes)
    }
}

/// Extract every plugin and theme identifier referenced in `markup`
pub fn extract(markup: &str) -> Fingerprints {
    Fingerprints {
        plugins: find_identifiers(&PLUGIN_RE, markup),
        themes: find_identifiers(&THEME_RE, markup),
    }
}

fn find_identifiers(re: &Regex, markup: &str) -> Vec<String> {
    let mut found = Vec::new();
    for caps in re.captures_iter(markup) {
        if let Some(slug) = caps.get(1) {
            insert_unique(&mut found, slug.as_str().to_string());
        }
    }
    found
}

// Case-sensitive: "Foo" and "foo" are distinct
fn insert_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}
