mod confirm_dialog;
mod list;
mod multi_select;
mod text_input;

pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use list::{List, ListEvent, ListRow};
pub use multi_select::{MultiSelect, MultiSelectEvent};
pub use text_input::{TextInput, TextInputEvent};
