//! Data model definitions for project storage.
//!
//! A project is stored as one [`ProjectRecord`] under its project code. The
//! record holds the standalone image list and the ordered list of
//! [`Template`]s. Images are opaque encoded strings (usually data URIs); this
//! crate never decodes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An opaque encoded image, e.g. `data:image/png;base64,...`.
///
/// An empty string is a placeholder for an image that has not been captured yet.
pub type ImageBlob = String;

/// The unit of persistence: everything stored under one project code.
///
/// # Serialization
///
/// Missing fields deserialize to empty sequences, so a record written by an
/// older client still loads.
///
/// ```rust
/// use template_store_core::project_model::ProjectRecord;
///
/// let record: ProjectRecord = serde_json::from_str(r#"{"images":["a"]}"#)?;
/// assert_eq!(record.images, vec!["a".to_string()]);
/// assert!(record.templates.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Standalone images, in display order.
    #[serde(default)]
    pub images: Vec<ImageBlob>,

    /// Templates, in display order. `templates[i].id == i + 1`.
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// One numbered template slot within a project.
///
/// # Structure
///
/// - **id**: 1-based display number, always `position + 1`
/// - **texts**: alternative texts, one of which is selected
/// - **selected_index**: the text currently displayed
/// - **text_images**: images per text slot, keyed by the slot's position at
///   the time the images were assigned
///
/// The persisted field names follow the shared document format
/// (`selectedIndex`, `textImages`):
///
/// ```rust
/// use template_store_core::project_model::Template;
///
/// let template = Template::new(1, vec!["Hi".into(), "Hey".into()], 1);
/// let json = serde_json::to_value(&template)?;
/// assert_eq!(json["selectedIndex"], 1);
/// assert!(json["textImages"].as_object().unwrap().is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
///
/// # Slot keys
///
/// `text_images` is addressed by positional slot index and is not re-keyed
/// when `texts` is edited. After an edit that removes or reorders texts, a key
/// may point at a different text or at no text at all.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: u32,

    pub texts: Vec<String>,

    pub selected_index: usize,

    /// JSON object keys are strings; serde_json parses them back into
    /// integers on load.
    #[serde(default)]
    pub text_images: BTreeMap<usize, Vec<ImageBlob>>,
}

impl Template {
    /// Creates a template with an empty image mapping.
    pub fn new(id: u32, texts: Vec<String>, selected_index: usize) -> Self {
        Self {
            id,
            texts,
            selected_index,
            text_images: BTreeMap::new(),
        }
    }

    /// The text currently displayed, or `None` if the selection does not
    /// point at a text.
    pub fn selected_text(&self) -> Option<&str> {
        self.texts.get(self.selected_index).map(String::as_str)
    }

    /// Images assigned to `slot`, empty if none were assigned.
    pub fn images_for_text(&self, slot: usize) -> &[ImageBlob] {
        self.text_images
            .get(&slot)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One field of a [`ProjectRecord`], carrying its full replacement value.
///
/// Stores replace the whole sequence; there are no per-element patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    Images(Vec<ImageBlob>),
    Templates(Vec<Template>),
}

impl ProjectField {
    /// The persisted field name.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectField::Images(_) => "images",
            ProjectField::Templates(_) => "templates",
        }
    }

    /// Writes this field's value into `record`, replacing the old sequence.
    pub fn apply_to(self, record: &mut ProjectRecord) {
        match self {
            ProjectField::Images(images) => record.images = images,
            ProjectField::Templates(templates) => record.templates = templates,
        }
    }
}

/// Trims a user-entered project code; `None` if nothing is left.
///
/// ```rust
/// use template_store_core::project_model::normalize_code;
///
/// assert_eq!(normalize_code("  F78j87I "), Some("F78j87I".to_string()));
/// assert_eq!(normalize_code("   "), None);
/// ```
pub fn normalize_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
