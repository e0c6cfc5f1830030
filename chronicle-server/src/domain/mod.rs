pub(crate) mod category;
pub(crate) mod clock;
pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod location;
pub(crate) mod post;
pub(crate) mod user;
pub(crate) mod visibility;
