use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::content_conf::ContentConfig;
use crate::dto::realisation_dto::Frontmatter;
use crate::model::realisation::{Realisation, RealisationMeta};
use crate::util::error::ServiceError;

/// File-backed store for the MDX "realisation" documents. One file per
/// entry, named `<slug>.mdx`, with a YAML front matter block followed
/// by the markdown body.
pub struct RealisationStore {
    dir: PathBuf,
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split a document into its YAML front matter and body. Documents
/// without a leading `---` block are all body.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text.strip_prefix("---") else {
        return (None, text);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, text);
    };
    let Some(end) = rest.find("\n---") else {
        return (None, text);
    };
    let yaml = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['\r', '\n']);
    (Some(yaml), body)
}

/// Parse a raw document into its front matter object and body. Invalid
/// or non-mapping YAML degrades to an empty front matter rather than an
/// error so a hand-edited file still lists.
pub fn parse_document(text: &str) -> (Frontmatter, String) {
    let (yaml, body) = split_front_matter(text);
    let frontmatter = yaml
        .and_then(|y| serde_yaml::from_str::<Value>(y).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();
    (frontmatter, body.to_string())
}

/// Render front matter and body back to the on-disk document format.
pub fn render_document(frontmatter: &Frontmatter, content: &str) -> Result<String, ServiceError> {
    let yaml = serde_yaml::to_string(&Value::Object(frontmatter.clone()))
        .map_err(|e| ServiceError::InternalError(format!("Failed to serialize front matter: {}", e)))?;
    Ok(format!("---\n{}---\n\n{}", yaml, content))
}

fn frontmatter_field<T: serde::de::DeserializeOwned>(
    frontmatter: &Frontmatter,
    key: &str,
) -> Option<T> {
    frontmatter.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Field-by-field typed view: a mistyped field falls back to its
/// default without dragging the valid ones down with it.
fn meta_from_frontmatter(frontmatter: &Frontmatter) -> RealisationMeta {
    let mut meta = RealisationMeta::default();
    if let Some(title) = frontmatter_field(frontmatter, "title") {
        meta.title = title;
    }
    if let Some(description) = frontmatter_field(frontmatter, "description") {
        meta.description = description;
    }
    if let Some(category) = frontmatter_field(frontmatter, "category") {
        meta.category = category;
    }
    if let Some(year) = frontmatter_field(frontmatter, "year") {
        meta.year = year;
    }
    if let Some(image) = frontmatter_field(frontmatter, "image") {
        meta.image = image;
    }
    if let Some(images) = frontmatter_field(frontmatter, "images") {
        meta.images = images;
    }
    if let Some(stats) = frontmatter_field(frontmatter, "stats") {
        meta.stats = stats;
    }
    if let Some(highlights) = frontmatter_field(frontmatter, "highlights") {
        meta.highlights = highlights;
    }
    meta
}

impl RealisationStore {
    pub fn new(config: &ContentConfig) -> Self {
        Self { dir: config.realisations_dir.clone() }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, slug: &str) -> Result<PathBuf, ServiceError> {
        if !is_valid_slug(slug) {
            return Err(ServiceError::InvalidInput("Invalid slug".to_string()));
        }
        Ok(self.dir.join(format!("{}.mdx", slug)))
    }

    async fn ensure_dir(&self) -> Result<(), ServiceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to create content dir: {}", e)))
    }

    async fn read_entry(&self, path: &Path, slug: &str) -> Result<Realisation, ServiceError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to read {}: {}", slug, e)))?;
        let (frontmatter, content) = parse_document(&text);
        let mut entry = Realisation {
            slug: slug.to_string(),
            meta: meta_from_frontmatter(&frontmatter),
            content,
        };
        entry.meta.images = entry.images_or_cover();
        Ok(entry)
    }

    /// All entries, newest year first. A missing directory is created
    /// and yields an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Realisation>, ServiceError> {
        self.ensure_dir().await?;
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to read content dir: {}", e)))?;

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to read content dir: {}", e)))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mdx") {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };
            match self.read_entry(&path, &slug).await {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(slug = %slug, "Skipping unreadable entry: {}", e),
            }
        }
        entries.sort_by(|a, b| b.meta.year.cmp(&a.meta.year).then(a.slug.cmp(&b.slug)));
        Ok(entries)
    }

    /// Raw front matter and body for the admin editor. `None` when the
    /// slug has no file.
    #[instrument(skip(self))]
    pub async fn get(&self, slug: &str) -> Result<Option<(Frontmatter, String)>, ServiceError> {
        let path = self.path_for(slug)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::InternalError(format!(
                    "Failed to read {}: {}",
                    slug, e
                )));
            }
        };
        Ok(Some(parse_document(&text)))
    }

    #[instrument(skip(self, frontmatter, content))]
    pub async fn create(
        &self,
        slug: &str,
        frontmatter: &Frontmatter,
        content: &str,
    ) -> Result<(), ServiceError> {
        let path = self.path_for(slug)?;
        self.ensure_dir().await?;
        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?
        {
            return Err(ServiceError::Conflict(
                "A realisation with this slug already exists".to_string(),
            ));
        }
        let document = render_document(frontmatter, content)?;
        tokio::fs::write(&path, document)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to write {}: {}", slug, e)))?;
        info!(slug = %slug, "Realisation created");
        Ok(())
    }

    /// Rewrite an entry, optionally renaming it. The rename target is
    /// checked for collisions before the old file is touched, so a
    /// failed rename leaves the store unchanged. Returns the slug the
    /// entry lives under afterwards.
    #[instrument(skip(self, frontmatter, content))]
    pub async fn update(
        &self,
        slug: &str,
        frontmatter: &Frontmatter,
        content: &str,
        new_slug: Option<&str>,
    ) -> Result<String, ServiceError> {
        let path = self.path_for(slug)?;
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?
        {
            return Err(ServiceError::NotFound(format!("Realisation {} not found", slug)));
        }

        let target_slug = match new_slug {
            Some(renamed) if renamed != slug => {
                let target = self.path_for(renamed)?;
                if tokio::fs::try_exists(&target)
                    .await
                    .map_err(|e| ServiceError::InternalError(e.to_string()))?
                {
                    return Err(ServiceError::Conflict(
                        "A realisation with the new slug already exists".to_string(),
                    ));
                }
                renamed.to_string()
            }
            _ => slug.to_string(),
        };

        let document = render_document(frontmatter, content)?;
        let target_path = self.path_for(&target_slug)?;
        tokio::fs::write(&target_path, document)
            .await
            .map_err(|e| {
                ServiceError::InternalError(format!("Failed to write {}: {}", target_slug, e))
            })?;
        if target_slug != slug {
            tokio::fs::remove_file(&path).await.map_err(|e| {
                ServiceError::InternalError(format!("Failed to remove {}: {}", slug, e))
            })?;
        }
        info!(slug = %slug, target = %target_slug, "Realisation updated");
        Ok(target_slug)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, slug: &str) -> Result<(), ServiceError> {
        let path = self.path_for(slug)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(slug = %slug, "Realisation deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ServiceError::NotFound(format!("Realisation {} not found", slug)))
            }
            Err(e) => Err(ServiceError::InternalError(format!(
                "Failed to delete {}: {}",
                slug, e
            ))),
        }
    }
}
