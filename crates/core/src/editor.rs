//! In-memory mirror of a wizard for the admin editor.
//!
//! Every structural edit is a [`EditCommand`]. Applying one updates the
//! working copy immediately (optimistic UI) and yields a [`PendingEdit`]
//! ticket. The caller sends the matching mutation to the server and hands the
//! outcome back through [`EditorMirror::reconcile`]: a confirmed tree becomes
//! the new baseline, a failure discards the edit. In both cases the working
//! copy is rebuilt from the confirmed baseline plus the edits still awaiting
//! an answer, so success is never assumed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field_type::{normalize_options, FieldType};
use crate::ordering::{is_contiguous, move_item, validate_permutation};
use crate::tree::{FieldNode, StepNode, WizardTree};
use crate::types::DbId;
use crate::wizard::{next_position, DEFAULT_FIELD_LABEL, DEFAULT_STEP_TITLE};

/// A structural edit, mirroring one admin mutation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditCommand {
    AddStep {
        title: Option<String>,
    },
    UpdateStep {
        step_id: DbId,
        title: Option<String>,
        description: Option<String>,
    },
    DeleteStep {
        step_id: DbId,
    },
    ReorderSteps {
        ordered: Vec<DbId>,
    },
    AddField {
        step_id: DbId,
        field_type: FieldType,
        label: Option<String>,
        options: Option<Vec<String>>,
    },
    UpdateField {
        field_id: DbId,
        field_type: Option<FieldType>,
        label: Option<String>,
        options: Option<Vec<String>>,
        required: Option<bool>,
    },
    DeleteField {
        field_id: DbId,
    },
    ReorderFields {
        step_id: DbId,
        ordered: Vec<DbId>,
    },
}

/// Ticket for an edit applied optimistically and awaiting the server.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    seq: u64,
    command: EditCommand,
}

impl PendingEdit {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn command(&self) -> &EditCommand {
        &self.command
    }
}

/// What the server said about a pending edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The mutation succeeded; carries the re-fetched wizard.
    Confirmed(WizardTree),
    /// The mutation failed; carries a message for the user.
    Failed(String),
}

/// Optimistic editor state for one wizard.
#[derive(Debug, Clone)]
pub struct EditorMirror {
    confirmed: WizardTree,
    working: WizardTree,
    pending: Vec<PendingEdit>,
    next_seq: u64,
    last_error: Option<String>,
}

impl EditorMirror {
    pub fn new(mut tree: WizardTree) -> Self {
        tree.sort();
        Self {
            working: tree.clone(),
            confirmed: tree,
            pending: Vec::new(),
            next_seq: 1,
            last_error: None,
        }
    }

    /// The tree the editor displays, including unconfirmed edits.
    pub fn view(&self) -> &WizardTree {
        &self.working
    }

    /// The last tree the server confirmed.
    pub fn confirmed(&self) -> &WizardTree {
        &self.confirmed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Take the most recent failure message, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Apply `command` to the working copy and queue it for confirmation.
    ///
    /// Commands that are invalid against the current view are rejected
    /// without being queued.
    pub fn apply(&mut self, command: EditCommand) -> Result<PendingEdit, CoreError> {
        apply_command(&mut self.working, &command)?;
        let ticket = PendingEdit {
            seq: self.next_seq,
            command,
        };
        self.next_seq += 1;
        self.pending.push(ticket.clone());
        Ok(ticket)
    }

    /// Settle a pending edit with the server's answer.
    pub fn reconcile(&mut self, ticket: &PendingEdit, outcome: EditOutcome) {
        self.pending.retain(|p| p.seq != ticket.seq);

        match outcome {
            EditOutcome::Confirmed(mut tree) => {
                tree.sort();
                self.confirmed = tree;
            }
            EditOutcome::Failed(reason) => {
                self.last_error = Some(reason);
            }
        }
        self.rebase();
    }

    /// Build the reorder command for dragging the step at `from` to `to`.
    pub fn move_step(&self, from: usize, to: usize) -> Option<EditCommand> {
        let mut ordered = self.working.step_ids();
        move_item(&mut ordered, from, to).then_some(EditCommand::ReorderSteps { ordered })
    }

    /// Build the reorder command for dragging a field within its step.
    pub fn move_field(&self, step_id: DbId, from: usize, to: usize) -> Option<EditCommand> {
        let mut ordered = self.working.step(step_id)?.field_ids();
        move_item(&mut ordered, from, to)
            .then_some(EditCommand::ReorderFields { step_id, ordered })
    }

    /// A reorder that restores `step_number = 1..N` on the confirmed tree.
    ///
    /// Deleting a step leaves a gap in the numbering; the editor follows a
    /// confirmed delete with this command. Returns `None` when the numbering
    /// is already contiguous.
    pub fn compaction(&self) -> Option<EditCommand> {
        let numbers: Vec<i32> = self.confirmed.steps.iter().map(|s| s.step_number).collect();
        if is_contiguous(&numbers) {
            return None;
        }
        Some(EditCommand::ReorderSteps {
            ordered: self.confirmed.step_ids(),
        })
    }

    /// Rebuild the working copy from the confirmed tree plus pending edits.
    ///
    /// Pending edits that no longer apply (e.g. their step vanished) are
    /// dropped and reported through `last_error`.
    fn rebase(&mut self) {
        let mut working = self.confirmed.clone();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for pending in self.pending.drain(..) {
            match apply_command(&mut working, &pending.command) {
                Ok(()) => still_pending.push(pending),
                Err(e) => self.last_error = Some(e.to_string()),
            }
        }
        self.pending = still_pending;
        self.working = working;
    }
}

fn step_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Step", id }
}

fn field_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Field", id }
}

/// Apply a command to `tree` in place.
fn apply_command(tree: &mut WizardTree, command: &EditCommand) -> Result<(), CoreError> {
    match command {
        EditCommand::AddStep { title } => {
            let step_number = next_position(tree.steps.iter().map(|s| s.step_number).max());
            tree.steps.push(StepNode {
                // Placeholder until the server-assigned id arrives.
                id: DbId::new_v4(),
                step_number,
                title: title.clone().unwrap_or_else(|| DEFAULT_STEP_TITLE.to_string()),
                description: None,
                layout_style: None,
                fields: Vec::new(),
            });
        }
        EditCommand::UpdateStep {
            step_id,
            title,
            description,
        } => {
            let step = tree.step_mut(*step_id).ok_or_else(|| step_not_found(*step_id))?;
            if let Some(title) = title {
                step.title = title.clone();
            }
            if let Some(description) = description {
                step.description = Some(description.clone());
            }
        }
        EditCommand::DeleteStep { step_id } => {
            let before = tree.steps.len();
            tree.steps.retain(|s| s.id != *step_id);
            if tree.steps.len() == before {
                return Err(step_not_found(*step_id));
            }
        }
        EditCommand::ReorderSteps { ordered } => {
            validate_permutation(&tree.step_ids(), ordered, "step")?;
            let mut by_id: HashMap<DbId, StepNode> =
                tree.steps.drain(..).map(|s| (s.id, s)).collect();
            tree.steps = ordered
                .iter()
                .zip(1..)
                .filter_map(|(id, number)| {
                    by_id.remove(id).map(|mut s| {
                        s.step_number = number;
                        s
                    })
                })
                .collect();
        }
        EditCommand::AddField {
            step_id,
            field_type,
            label,
            options,
        } => {
            let options = normalize_options(*field_type, options.clone())?;
            let step = tree.step_mut(*step_id).ok_or_else(|| step_not_found(*step_id))?;
            let order_index = next_position(step.fields.iter().map(|f| f.order_index).max());
            step.fields.push(FieldNode {
                id: DbId::new_v4(),
                step_id: *step_id,
                field_type: *field_type,
                label: label.clone().unwrap_or_else(|| DEFAULT_FIELD_LABEL.to_string()),
                options,
                required: false,
                order_index,
            });
        }
        EditCommand::UpdateField {
            field_id,
            field_type,
            label,
            options,
            required,
        } => {
            let field = tree
                .field_mut(*field_id)
                .ok_or_else(|| field_not_found(*field_id))?;
            let new_type = field_type.unwrap_or(field.field_type);
            let merged = options.clone().or_else(|| field.options.clone());
            field.options = normalize_options(new_type, merged)?;
            field.field_type = new_type;
            if let Some(label) = label {
                field.label = label.clone();
            }
            if let Some(required) = required {
                field.required = *required;
            }
        }
        EditCommand::DeleteField { field_id } => {
            let step = tree
                .steps
                .iter_mut()
                .find(|s| s.fields.iter().any(|f| f.id == *field_id))
                .ok_or_else(|| field_not_found(*field_id))?;
            step.fields.retain(|f| f.id != *field_id);
        }
        EditCommand::ReorderFields { step_id, ordered } => {
            let step = tree.step_mut(*step_id).ok_or_else(|| step_not_found(*step_id))?;
            validate_permutation(&step.field_ids(), ordered, "field")?;
            let mut by_id: HashMap<DbId, FieldNode> =
                step.fields.drain(..).map(|f| (f.id, f)).collect();
            step.fields = ordered
                .iter()
                .zip(1..)
                .filter_map(|(id, index)| {
                    by_id.remove(id).map(|mut f| {
                        f.order_index = index;
                        f
                    })
                })
                .collect();
        }
    }
    Ok(())
}
