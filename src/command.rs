//! JSON-friendly commands covering every manager mutation.
//!
//! ```rust
//! use template_store_core::command::ProjectCommand;
//!
//! let command: ProjectCommand = serde_json::from_str(
//!     r#"{"op":"create_template","texts":["Hi","Hey"],"selected_index":0}"#,
//! )?;
//! assert_eq!(
//!     command,
//!     ProjectCommand::CreateTemplate { texts: vec!["Hi".into(), "Hey".into()], selected_index: 0, insert_after: None }
//! );
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::manager::{Direction, TemplateCollectionManager};
use crate::project_model::{ImageBlob, ProjectRecord};
use crate::project_store::ProjectStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProjectCommand {
    AddImage {
        #[serde(default)]
        blob: Option<ImageBlob>,
    },
    UpdateImage {
        index: usize,
        blob: ImageBlob,
    },
    DeleteImage {
        index: usize,
    },
    CreateTemplate {
        texts: Vec<String>,
        selected_index: usize,
        #[serde(default)]
        insert_after: Option<usize>,
    },
    EditTemplate {
        index: usize,
        texts: Vec<String>,
        selected_index: usize,
    },
    DeleteTemplate {
        index: usize,
    },
    NavigateText {
        index: usize,
        direction: Direction,
    },
    SetTextImages {
        template_index: usize,
        slot: usize,
        images: Vec<ImageBlob>,
    },
}

impl<S: ProjectStore> TemplateCollectionManager<S> {
    /// Runs `command` and returns the resulting state.
    pub fn apply(&mut self, command: ProjectCommand) -> Result<ProjectRecord, TemplateError> {
        match command {
            ProjectCommand::AddImage { blob } => {
                self.add_standalone_image(blob)?;
            }
            ProjectCommand::UpdateImage { index, blob } => self.update_standalone_image(index, blob)?,
            ProjectCommand::DeleteImage { index } => self.delete_standalone_image(index)?,
            ProjectCommand::CreateTemplate {
                texts,
                selected_index,
                insert_after,
            } => {
                self.create_template(texts, selected_index, insert_after)?;
            }
            ProjectCommand::EditTemplate {
                index,
                texts,
                selected_index,
            } => self.edit_template(index, texts, selected_index)?,
            ProjectCommand::DeleteTemplate { index } => self.delete_template(index)?,
            ProjectCommand::NavigateText { index, direction } => self.navigate_template_text(index, direction)?,
            ProjectCommand::SetTextImages {
                template_index,
                slot,
                images,
            } => self.set_text_images(template_index, slot, images)?,
        }
        Ok(self.snapshot())
    }
}
