pub(crate) mod body;
pub(crate) mod constraint;
pub(crate) mod document;
pub(crate) mod object;
