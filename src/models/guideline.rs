//! Guideline reference data
//!
//! Categories carry an icon name; `GuidelineIcon` resolves it to a static
//! asset at compile time instead of looking components up by string.

use serde::{Deserialize, Serialize};

/// A guideline category shown on the guidelines page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineCategory {
    pub id: String,
    pub title: String,
    /// Icon name, see [`GuidelineIcon::from_name`]
    pub icon: String,
    pub description: String,
}

impl GuidelineCategory {
    /// Resolved icon for this category
    pub fn icon(&self) -> GuidelineIcon {
        GuidelineIcon::from_name(&self.icon)
    }
}

/// Step-by-step guideline belonging to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guideline {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Guideline {
    /// Case-insensitive match against the title or any step.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self.steps.iter().any(|s| s.to_lowercase().contains(&term))
    }
}

/// Icons known to the guidelines view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidelineIcon {
    Droplet,
    Shield,
    Stethoscope,
    Flame,
    CloudLightning,
    LogOut,
    /// Fallback for unknown names
    BookOpen,
}

impl GuidelineIcon {
    /// Map an icon name (`cloud-lightning`, `CloudLightning`, ...) to an icon.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "droplet" => GuidelineIcon::Droplet,
            "shield" => GuidelineIcon::Shield,
            "stethoscope" => GuidelineIcon::Stethoscope,
            "flame" => GuidelineIcon::Flame,
            "cloudlightning" => GuidelineIcon::CloudLightning,
            "logout" => GuidelineIcon::LogOut,
            _ => GuidelineIcon::BookOpen,
        }
    }

    /// Asset identifier rendered by the view
    pub fn asset(self) -> &'static str {
        match self {
            GuidelineIcon::Droplet => "icons/droplet.svg",
            GuidelineIcon::Shield => "icons/shield.svg",
            GuidelineIcon::Stethoscope => "icons/stethoscope.svg",
            GuidelineIcon::Flame => "icons/flame.svg",
            GuidelineIcon::CloudLightning => "icons/cloud-lightning.svg",
            GuidelineIcon::LogOut => "icons/log-out.svg",
            GuidelineIcon::BookOpen => "icons/book-open.svg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_lookup_accepts_kebab_and_pascal_case() {
        assert_eq!(GuidelineIcon::from_name("cloud-lightning"), GuidelineIcon::CloudLightning);
        assert_eq!(GuidelineIcon::from_name("CloudLightning"), GuidelineIcon::CloudLightning);
        assert_eq!(GuidelineIcon::from_name("log-out"), GuidelineIcon::LogOut);
    }

    #[test]
    fn test_unknown_icon_falls_back_to_book() {
        let icon = GuidelineIcon::from_name("rocket");
        assert_eq!(icon, GuidelineIcon::BookOpen);
        assert_eq!(icon.asset(), "icons/book-open.svg");
    }

    #[test]
    fn test_guideline_matches_title_and_steps() {
        let guideline = Guideline {
            id: "1".into(),
            category_id: "fire".into(),
            title: "Fire Emergency Response".into(),
            steps: vec!["Keep a fire extinguisher nearby".into()],
            additional_info: None,
        };

        assert!(guideline.matches("FIRE"));
        assert!(guideline.matches("extinguisher"));
        assert!(guideline.matches("   "));
        assert!(!guideline.matches("flood"));
    }
}
