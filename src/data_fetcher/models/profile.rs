use serde::{Deserialize, Serialize};

/// `/player/{handle}`. Only the fields used for name matching are kept.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    #[serde(default)]
    pub username: String,
    /// Free-text real name, if the player filled it in
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Country resource URL, e.g. `https://api.chess.com/pub/country/NO`
    #[serde(default)]
    pub country: Option<String>,
}

impl PlayerProfile {
    /// Country code from the country URL
    pub fn country_code(&self) -> Option<&str> {
        self.country
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|code| !code.is_empty())
    }

    /// Name, or `None` when missing or blank
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
