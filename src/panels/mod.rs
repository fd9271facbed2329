mod properties;
mod toolbar;

pub use properties::properties_panel;
pub use toolbar::{ToolbarAction, toolbar};
