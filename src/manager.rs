//! In-memory template and image collections for one loaded project.
//!
//! [`TemplateCollectionManager`] holds the `templates` and `images` sequences
//! of a project and writes the whole affected sequence back to its
//! [`ProjectStore`] after every mutation. Validation happens first, so a
//! rejected call changes nothing. A store failure is reported after the
//! in-memory change has been applied; memory and store then disagree until
//! the next successful write.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{check_index, TemplateError};
use crate::project_model::{ImageBlob, ProjectField, ProjectRecord, Template};
use crate::project_store::ProjectStore;

/// Direction for [`TemplateCollectionManager::navigate_template_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Prev,
    Next,
}

pub struct TemplateCollectionManager<S: ProjectStore> {
    store: S,
    code: String,
    templates: Vec<Template>,
    images: Vec<ImageBlob>,
}

impl<S: ProjectStore> TemplateCollectionManager<S> {
    /// Loads the project stored under `code`, creating an empty record on
    /// first access.
    ///
    /// Templates stored without a `textImages` mapping come back with an
    /// empty one.
    pub fn load(store: S, code: impl Into<String>) -> Result<Self, TemplateError> {
        let code = code.into();

        let record = match store.get(&code)? {
            Some(record) => {
                info!("Loaded project '{}' ({} templates, {} images)", code, record.templates.len(), record.images.len());
                record
            }
            None => {
                let record = ProjectRecord::default();
                store.create(&code, &record)?;
                info!("Created empty project '{}'", code);
                record
            }
        };

        Ok(Self::from_record(store, code, record))
    }

    /// Loads a project only if it already has at least one template.
    ///
    /// Never writes to the store. Absent records and records with no
    /// templates are reported as [`TemplateError::NotFound`].
    pub fn open_existing(store: S, code: impl Into<String>) -> Result<Self, TemplateError> {
        let code = code.into();

        match store.get(&code)? {
            Some(record) if !record.templates.is_empty() => Ok(Self::from_record(store, code, record)),
            _ => {
                info!("Project '{}' does not exist or has no templates", code);
                Err(TemplateError::NotFound(code))
            }
        }
    }

    fn from_record(store: S, code: String, record: ProjectRecord) -> Self {
        Self {
            store,
            code,
            templates: record.templates,
            images: record.images,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn images(&self) -> &[ImageBlob] {
        &self.images
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Copy of the current in-memory state.
    pub fn snapshot(&self) -> ProjectRecord {
        ProjectRecord {
            images: self.images.clone(),
            templates: self.templates.clone(),
        }
    }

    // Standalone images

    /// Appends `blob`, or an empty placeholder, and returns its index.
    pub fn add_standalone_image(&mut self, blob: Option<ImageBlob>) -> Result<usize, TemplateError> {
        self.images.push(blob.unwrap_or_default());
        let index = self.images.len() - 1;
        self.persist_images()?;
        Ok(index)
    }

    pub fn update_standalone_image(&mut self, index: usize, blob: ImageBlob) -> Result<(), TemplateError> {
        check_index(index, self.images.len())?;
        self.images[index] = blob;
        self.persist_images()
    }

    pub fn delete_standalone_image(&mut self, index: usize) -> Result<(), TemplateError> {
        check_index(index, self.images.len())?;
        self.images.remove(index);
        self.persist_images()
    }

    // Templates

    /// Creates a template from `texts` with `selected_index` selected.
    ///
    /// With `insert_after = Some(k)` the template lands at position `k + 1`
    /// (`k` indexes the sequence before insertion); otherwise it is appended.
    /// Every template is renumbered afterwards.
    pub fn create_template(
        &mut self,
        texts: Vec<String>,
        selected_index: usize,
        insert_after: Option<usize>,
    ) -> Result<Template, TemplateError> {
        validate_texts(&texts, selected_index)?;

        let position = match insert_after {
            Some(after) => {
                check_index(after, self.templates.len())?;
                after + 1
            }
            None => self.templates.len(),
        };

        self.templates.insert(position, Template::new(0, texts, selected_index));
        renumber(&mut self.templates);
        let created = self.templates[position].clone();

        debug!("Created template #{} in project '{}'", created.id, self.code);
        self.persist_templates()?;
        Ok(created)
    }

    /// Replaces the texts and selection of the template at `index`.
    ///
    /// `text_images` is kept as-is, even when `texts` shrinks or is reordered.
    pub fn edit_template(&mut self, index: usize, texts: Vec<String>, selected_index: usize) -> Result<(), TemplateError> {
        check_index(index, self.templates.len())?;
        validate_texts(&texts, selected_index)?;

        let template = &mut self.templates[index];
        template.texts = texts;
        template.selected_index = selected_index;

        self.persist_templates()
    }

    pub fn delete_template(&mut self, index: usize) -> Result<(), TemplateError> {
        check_index(index, self.templates.len())?;

        let removed = self.templates.remove(index);
        renumber(&mut self.templates);

        debug!("Deleted template #{} from project '{}'", removed.id, self.code);
        self.persist_templates()
    }

    /// Moves the selection one text back or forward, clamped to the ends.
    /// Persists even when the selection did not move.
    pub fn navigate_template_text(&mut self, index: usize, direction: Direction) -> Result<(), TemplateError> {
        check_index(index, self.templates.len())?;

        let template = &mut self.templates[index];
        let last = template.texts.len().saturating_sub(1);
        template.selected_index = match direction {
            Direction::Prev => template.selected_index.saturating_sub(1),
            Direction::Next => (template.selected_index + 1).min(last),
        };

        self.persist_templates()
    }

    /// Sets the gallery for text slot `slot` of the template at
    /// `template_index`. Blank blobs are dropped; other slots are untouched.
    pub fn set_text_images(
        &mut self,
        template_index: usize,
        slot: usize,
        images: Vec<ImageBlob>,
    ) -> Result<(), TemplateError> {
        check_index(template_index, self.templates.len())?;

        let images: Vec<ImageBlob> = images.into_iter().filter(|blob| !blob.trim().is_empty()).collect();
        self.templates[template_index].text_images.insert(slot, images);

        self.persist_templates()
    }

    /// Removes the whole project from the store. Absent records are fine.
    ///
    /// The in-memory state is left as it was; later mutations will fail with
    /// a store `NotFound`.
    pub fn delete_project(&self) -> Result<(), TemplateError> {
        if self.store.delete(&self.code)? {
            info!("Deleted project '{}'", self.code);
        } else {
            debug!("Project '{}' was already absent", self.code);
        }
        Ok(())
    }

    fn persist_images(&self) -> Result<(), TemplateError> {
        self.persist(ProjectField::Images(self.images.clone()))
    }

    fn persist_templates(&self) -> Result<(), TemplateError> {
        self.persist(ProjectField::Templates(self.templates.clone()))
    }

    fn persist(&self, field: ProjectField) -> Result<(), TemplateError> {
        let name = field.name();
        self.store.replace_field(&self.code, field).map_err(|e| {
            warn!("Failed to persist '{}' of project '{}': {}", name, self.code, e);
            TemplateError::from(e)
        })
    }
}

/// Sets every template's `id` to its 1-based position.
pub fn renumber(templates: &mut [Template]) {
    for (position, template) in templates.iter_mut().enumerate() {
        template.id = position as u32 + 1;
    }
}

fn validate_texts(texts: &[String], selected_index: usize) -> Result<(), TemplateError> {
    if texts.is_empty() {
        return Err(TemplateError::InvalidTextSelection("a template needs at least one text".to_string()));
    }
    if let Some(blank) = texts.iter().position(|text| text.trim().is_empty()) {
        return Err(TemplateError::InvalidTextSelection(format!("text {} is blank", blank)));
    }
    if selected_index >= texts.len() {
        return Err(TemplateError::InvalidTextSelection(format!(
            "selected index {} is outside {} texts",
            selected_index,
            texts.len()
        )));
    }
    Ok(())
}
