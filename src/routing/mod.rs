pub(crate) mod ancestry;
pub(crate) mod guard;
pub(crate) mod params;
pub(crate) mod url;
