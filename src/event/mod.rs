mod handler;
mod input;

pub use handler::run_app;
pub use input::{address_action, editor_action, AddressAction, EditorAction};
