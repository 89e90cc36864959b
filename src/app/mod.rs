mod state;

pub use state::{App, Areas, Focus, NavPointer, Notification};
