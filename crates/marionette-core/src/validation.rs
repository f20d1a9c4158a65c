//! Preconditions checked on the UI thread before acting on a component.

use crate::error::ActionFailedError;
use marionette_toolkit::{ComponentId, ComponentTree};

fn describe(tree: &ComponentTree, id: ComponentId) -> Result<String, ActionFailedError> {
    tree.get(id)
        .map(ToString::to_string)
        .ok_or_else(|| ActionFailedError::new(format!("component {id} is not in the hierarchy")))
}

/// Fails unless `id` and all of its ancestors are visible under a root.
pub fn ensure_showing(tree: &ComponentTree, id: ComponentId) -> Result<(), ActionFailedError> {
    let description = describe(tree, id)?;
    if !tree.is_showing(id) {
        return Err(ActionFailedError::not_showing(description));
    }
    Ok(())
}

pub fn ensure_enabled(tree: &ComponentTree, id: ComponentId) -> Result<(), ActionFailedError> {
    let description = describe(tree, id)?;
    match tree.get(id) {
        Some(component) if component.enabled => Ok(()),
        _ => Err(ActionFailedError::not_enabled(description)),
    }
}

/// Both checks, enabled first.
pub fn ensure_enabled_and_showing(
    tree: &ComponentTree,
    id: ComponentId,
) -> Result<(), ActionFailedError> {
    ensure_enabled(tree, id)?;
    ensure_showing(tree, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marionette_toolkit::{Component, ComponentKind};

    fn tree_with_button() -> (ComponentTree, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new();
        let frame = tree
            .add_root(Component::new(ComponentKind::Frame))
            .expect("frame");
        let button = tree
            .add_child(frame, Component::new(ComponentKind::Button).with_name("ok"))
            .expect("button");
        (tree, frame, button)
    }

    #[test]
    fn showing_component_passes() {
        let (tree, _, button) = tree_with_button();
        assert!(ensure_enabled_and_showing(&tree, button).is_ok());
    }

    #[test]
    fn hidden_ancestor_fails_showing_check() {
        let (mut tree, frame, button) = tree_with_button();
        tree.update(frame, |c| c.visible = false).expect("hide");
        let err = ensure_showing(&tree, button).expect_err("hidden");
        assert!(err.message.contains("name='ok'"), "{}", err.message);
        assert!(err.message.contains("showing"));
    }

    #[test]
    fn disabled_component_fails_enabled_check() {
        let (mut tree, _, button) = tree_with_button();
        tree.update(button, |c| c.enabled = false).expect("disable");
        let err = ensure_enabled_and_showing(&tree, button).expect_err("disabled");
        assert!(err.message.contains("enabled"));
    }

    #[test]
    fn removed_component_fails() {
        let (mut tree, frame, button) = tree_with_button();
        tree.remove(frame).expect("remove");
        let err = ensure_showing(&tree, button).expect_err("removed");
        assert!(err.message.contains("not in the hierarchy"));
    }
}
