pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod form_fields;
pub(crate) mod posts;
pub(crate) mod profiles;
