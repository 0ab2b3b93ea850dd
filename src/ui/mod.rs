pub(crate) mod button;
pub(crate) mod input;
pub(crate) mod scroll;
