//! Scene model: placed objects, their ordering and the selection.

pub(crate) mod graph;
pub(crate) mod object;
pub(crate) mod text;
