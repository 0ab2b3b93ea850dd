pub(crate) mod description;
pub(crate) mod draw;
pub(crate) mod drawable;
pub(crate) mod mailbox;
pub(crate) mod tree;
