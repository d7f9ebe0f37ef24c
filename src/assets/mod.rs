//! Media and font collaborators: decoding, probing and font availability.

pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod media;
