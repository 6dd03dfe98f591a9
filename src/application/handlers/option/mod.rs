//! Option command handlers. Only the owner or an administrator manages
//! options directly; everyone else goes through suggestions.

mod add_option;
mod delete_option;
mod edit_option;

pub use add_option::{AddOptionCommand, AddOptionHandler};
pub use delete_option::{DeleteOptionCommand, DeleteOptionHandler};
pub use edit_option::{EditOptionCommand, EditOptionHandler};
