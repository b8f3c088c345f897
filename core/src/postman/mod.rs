#![deny(missing_docs)]

//! # Postman Collection Model
//!
//! - **wire**: serde mirror of the v2.1 JSON format.
//! - **url**, **auth**, **body**, **response**: leaf models.
//! - **request**: one operation built from the leaf models.
//! - **item**: the folder / request tree.
//! - **collection**: the root, assembling the OpenAPI document.

pub mod auth;
pub mod body;
pub mod collection;
pub mod info;
pub mod item;
pub mod request;
pub mod response;
pub mod url;
pub mod wire;

pub use auth::{ApiKeyAuth, Auth};
pub use body::{FormField, RawLanguage, RequestBody};
pub use collection::Collection;
pub use info::Info;
pub use item::{Folder, Item, Leaf};
pub use request::Request;
pub use response::Response;
pub use url::{QueryParam, Url};
