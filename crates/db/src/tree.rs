//! Assembles a [`WizardTree`] from the wizard, step, and field tables.

use formstep_core::tree::{StepNode, WizardTree};
use formstep_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{FieldRepo, StepRepo, WizardRepo};

/// Load a wizard with its steps and fields in display order.
///
/// Returns `None` if the wizard does not exist. A stored field type the
/// application does not recognise surfaces as [`sqlx::Error::Decode`].
pub async fn load_wizard_tree(
    pool: &PgPool,
    wizard_id: DbId,
) -> Result<Option<WizardTree>, sqlx::Error> {
    let Some(wizard) = WizardRepo::find_by_id(pool, wizard_id).await? else {
        return Ok(None);
    };

    let steps = StepRepo::list_by_wizard(pool, wizard_id).await?;
    let fields = FieldRepo::list_by_wizard(pool, wizard_id).await?;

    let mut nodes: Vec<StepNode> = steps
        .into_iter()
        .map(|s| StepNode {
            id: s.id,
            step_number: s.step_number,
            title: s.title,
            description: s.description,
            layout_style: s.layout_style,
            fields: Vec::new(),
        })
        .collect();

    for field in &fields {
        let node = field
            .to_node()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        if let Some(step) = nodes.iter_mut().find(|s| s.id == node.step_id) {
            step.fields.push(node);
        }
    }

    let mut tree = WizardTree {
        id: wizard.id,
        title: wizard.title,
        description: wizard.description,
        theme_color_primary: wizard.theme_color_primary,
        theme_color_secondary: wizard.theme_color_secondary,
        font_family: wizard.font_family,
        logo_url: wizard.logo_url,
        background_url: wizard.background_url,
        steps: nodes,
    };
    tree.sort();
    Ok(Some(tree))
}
