//! Content entities for the agency site.
//!
//! One module per table. Each module owns the sea-orm entity, the create and
//! patch inputs accepted by the admin panel, and the field rules for them.

pub mod errors;
pub mod db;
pub mod table;
pub mod media;
pub mod service;
pub mod sub_service;
pub mod project;
pub mod project_metric;
pub mod project_feedback;
pub mod project_gallery;
pub mod testimonial;
pub mod client_logo;

pub use table::{ChildRule, Editable, OnDelete, ParentRef, Record, Row, Table, Visible};
