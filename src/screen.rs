//! Full-page views, in the order the user meets them: home, file picker,
//! service selection and container selection.

mod container_select;
mod file_picker;
mod home;
mod service_select;

pub use container_select::{ContainerSelectEvent, ContainerSelectScreen};
pub use file_picker::{FilePickerEvent, FilePickerScreen};
pub use home::{HomeEvent, HomeScreen};
pub use service_select::{ServiceSelectEvent, ServiceSelectScreen};
