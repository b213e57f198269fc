pub(crate) mod assign;
pub(crate) mod index;
