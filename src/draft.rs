//! Editing buffers used before committing to the manager.
//!
//! A [`TemplateDraft`] collects the alternative texts of a template being
//! created or edited; a [`GalleryDraft`] collects the images for one text
//! slot. Both tolerate blank entries while editing and drop them on
//! `finish`.

use crate::error::{check_index, TemplateError};
use crate::project_model::{ImageBlob, Template};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    texts: Vec<String>,
    selected: Option<usize>,
}

impl Default for TemplateDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateDraft {
    /// One empty text, nothing selected.
    pub fn new() -> Self {
        Self {
            texts: vec![String::new()],
            selected: None,
        }
    }

    pub fn from_template(template: &Template) -> Self {
        if template.texts.is_empty() {
            return Self::new();
        }
        Self {
            texts: template.texts.clone(),
            selected: (template.selected_index < template.texts.len()).then_some(template.selected_index),
        }
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Appends an empty text and returns its index.
    pub fn add_text(&mut self) -> usize {
        self.texts.push(String::new());
        self.texts.len() - 1
    }

    pub fn update_text(&mut self, index: usize, value: impl Into<String>) -> Result<(), TemplateError> {
        check_index(index, self.texts.len())?;
        self.texts[index] = value.into();
        Ok(())
    }

    /// Removes a text. Removing the selected text clears the selection;
    /// removing an earlier one keeps the same text selected.
    pub fn delete_text(&mut self, index: usize) -> Result<(), TemplateError> {
        check_index(index, self.texts.len())?;
        self.texts.remove(index);

        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Result<(), TemplateError> {
        check_index(index, self.texts.len())?;
        self.selected = Some(index);
        Ok(())
    }

    /// Returns the non-blank texts and the selection's position among them.
    ///
    /// Fails unless a non-blank text is selected.
    pub fn finish(&self) -> Result<(Vec<String>, usize), TemplateError> {
        let selected = self
            .selected
            .ok_or_else(|| TemplateError::InvalidTextSelection("no text selected".to_string()))?;

        if self.texts.get(selected).map_or(true, |text| text.trim().is_empty()) {
            return Err(TemplateError::InvalidTextSelection("the selected text is blank".to_string()));
        }

        let blanks_before = self.texts[..selected]
            .iter()
            .filter(|text| text.trim().is_empty())
            .count();
        let texts = self.texts.iter().filter(|text| !text.trim().is_empty()).cloned().collect();

        Ok((texts, selected - blanks_before))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryDraft {
    images: Vec<ImageBlob>,
}

impl GalleryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_images(images: &[ImageBlob]) -> Self {
        Self { images: images.to_vec() }
    }

    pub fn images(&self) -> &[ImageBlob] {
        &self.images
    }

    /// Appends an empty slot awaiting capture and returns its index.
    pub fn add_slot(&mut self) -> usize {
        self.images.push(String::new());
        self.images.len() - 1
    }

    pub fn set(&mut self, index: usize, blob: ImageBlob) -> Result<(), TemplateError> {
        check_index(index, self.images.len())?;
        self.images[index] = blob;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<(), TemplateError> {
        check_index(index, self.images.len())?;
        self.images.remove(index);
        Ok(())
    }

    /// The captured images, blank slots dropped.
    pub fn finish(&self) -> Vec<ImageBlob> {
        self.images.iter().filter(|blob| !blob.trim().is_empty()).cloned().collect()
    }
}
