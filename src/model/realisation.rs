use serde::{Deserialize, Serialize};

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

fn placeholder_image() -> String {
    "/placeholder.svg?height=400&width=600".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationStat {
    pub label: String,
    pub value: String,
}

/// Typed view of a realisation's front matter, with the defaulting the
/// public listing applies to sparse documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealisationMeta {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "current_year")]
    pub year: i32,
    #[serde(default = "placeholder_image")]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stats: Vec<RealisationStat>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

fn default_title() -> String {
    "Untitled".to_string()
}

fn default_category() -> String {
    "Général".to_string()
}

impl Default for RealisationMeta {
    fn default() -> Self {
        RealisationMeta {
            title: default_title(),
            description: String::new(),
            category: default_category(),
            year: current_year(),
            image: placeholder_image(),
            images: Vec::new(),
            stats: Vec::new(),
            highlights: Vec::new(),
        }
    }
}

/// A full content entry: parsed front matter plus the raw markdown body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realisation {
    pub slug: String,
    #[serde(flatten)]
    pub meta: RealisationMeta,
    pub content: String,
}

impl Realisation {
    /// Listing shows at least one image; fall back to the cover.
    pub fn images_or_cover(&self) -> Vec<String> {
        if self.meta.images.is_empty() {
            vec![self.meta.image.clone()]
        } else {
            self.meta.images.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_defaults() {
        let meta: RealisationMeta = serde_yaml::from_str("description: test").unwrap();
        assert_eq!(meta.title, "Untitled");
        assert_eq!(meta.category, "Général");
        assert!(meta.images.is_empty());
        assert!(meta.stats.is_empty());
    }

    #[test]
    fn test_images_fall_back_to_cover() {
        let meta: RealisationMeta = serde_yaml::from_str("image: \"/a.jpg\"").unwrap();
        let entry = Realisation { slug: "x".to_string(), meta, content: String::new() };
        assert_eq!(entry.images_or_cover(), vec!["/a.jpg".to_string()]);
    }
}
