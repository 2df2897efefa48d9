//! HTTP Response domain types

mod spec;

pub use spec::{Response, ResponseBody, StatusCode};
