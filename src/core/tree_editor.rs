// src/core/tree_editor.rs

//! Structural edits on the pipeline tree: resizing the stepSet and segment
//! lists and adding or removing function entries. Every level of the tree keeps
//! at least one entry, so each operation refuses edits that would empty it.

use crate::models::{FunctionCall, PipeSegment, PipelineConfig, PipelineMode, StepSet};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("A pipeline needs at least one {what}; cannot resize to {requested}.")]
    CountTooSmall { what: &'static str, requested: usize },
    #[error("Cannot remove the last function of stepSet '{label}'.")]
    LastFunction { label: String },
    #[error("No function with key {key} in stepSet '{label}'.")]
    UnknownFunction { key: Uuid, label: String },
}

impl PipelineConfig {
    /// A fresh configuration with the default tree for `mode`: one stepSet (or
    /// one segment holding one stepSet) containing one empty function entry.
    pub fn new(mode: PipelineMode) -> Self {
        let mut config = Self::default();
        config.basic.mode = mode;
        config.reset_tree();
        config
    }

    /// Restores the default tree for the current mode. BasicInfo and the
    /// runtime switches are kept; the inactive tree is cleared.
    pub fn reset_tree(&mut self) {
        match self.basic.mode {
            PipelineMode::Linear => {
                self.step_sets = vec![StepSet::default()];
                self.segments.clear();
            }
            PipelineMode::Branch => {
                self.step_sets.clear();
                self.segments = vec![PipeSegment::default()];
            }
        }
        log::debug!("Reset the {} pipeline tree.", self.basic.mode);
    }
}

impl StepSet {
    /// Appends a function entry and returns its key.
    pub fn add_function(&mut self, function: FunctionCall) -> Uuid {
        let key = function.key;
        self.functions.push(function);
        key
    }

    /// Removes the function entry with `key`. The last entry cannot be removed.
    pub fn remove_function(&mut self, key: Uuid) -> Result<FunctionCall, EditError> {
        let index = self
            .functions
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| EditError::UnknownFunction { key, label: self.label.clone() })?;
        if self.functions.len() == 1 {
            return Err(EditError::LastFunction { label: self.label.clone() });
        }
        Ok(self.functions.remove(index))
    }
}

/// Grows or shrinks a stepSet list to exactly `count` entries.
pub fn resize_step_sets(step_sets: &mut Vec<StepSet>, count: usize) -> Result<(), EditError> {
    resize_with_defaults(step_sets, count, "stepSet")
}

/// Grows or shrinks a segment list to exactly `count` entries.
pub fn resize_segments(segments: &mut Vec<PipeSegment>, count: usize) -> Result<(), EditError> {
    resize_with_defaults(segments, count, "pipe segment")
}

fn resize_with_defaults<T: Default>(
    list: &mut Vec<T>,
    count: usize,
    what: &'static str,
) -> Result<(), EditError> {
    if count == 0 {
        return Err(EditError::CountTooSmall { what, requested: count });
    }
    // Existing entries keep their position and content.
    list.resize_with(count, T::default);
    Ok(())
}
