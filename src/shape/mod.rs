pub mod inferrer;

pub use inferrer::{infer, FieldType, FieldTypeMap};
