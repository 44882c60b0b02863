pub mod locale_rewrite;
pub mod request_id;
