//! Request middleware

pub mod user_context;

pub use user_context::{user_context_middleware, UserContext, USER_ID_HEADER};
