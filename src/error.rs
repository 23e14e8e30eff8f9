//! Framework error type.

use crate::dom::ElementId;
use crate::ext::MethodGroup;
use crate::selector::SelectorError;

/// Errors surfaced by extension operations.
///
/// Malformed embedded configuration is not an error (it is logged and
/// ignored), and neither is removing or canceling something twice.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("{extension}: no action named '{action}'")]
    InvalidAction { extension: String, action: String },

    #[error("{extension}: listener for '{event}' declared without a handler")]
    MissingHandler { extension: String, event: String },

    #[error("element {0:?} is not in the document")]
    UnknownElement(ElementId),

    #[error("{extension}: instance {id} has been removed")]
    Removed { extension: String, id: u64 },

    #[error("{extension}: instance {id} is already in use")]
    Busy { extension: String, id: u64 },

    #[error("{extension}: method group '{group}' is not enabled")]
    MethodGroupDisabled { extension: String, group: MethodGroup },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}
