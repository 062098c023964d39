pub mod layout;
pub mod note_ops;
