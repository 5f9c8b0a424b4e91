pub mod constants;
pub mod storage;
pub mod url;

pub use constants::{FLAGS_PER_PAGE, SERVER_PASSWORD_KEY};
pub use storage::{load_from_storage, remove_from_storage, save_to_storage};
