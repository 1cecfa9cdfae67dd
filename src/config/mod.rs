pub mod load;
pub mod save;
pub mod types;

pub use load::LOCAL_SETTINGS_FILE;
pub use save::{save_settings, write_settings};
pub use types::{DecoderTable, GridLayout, SheetSettings};
