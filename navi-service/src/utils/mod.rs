pub mod count;
pub mod filename;
pub mod password;
pub mod validation;

pub use count::{coerce_count, deserialize_optional_count};
pub use filename::{has_allowed_extension, secure_filename, stored_document_name};
pub use password::{hash_password, verify_password, Password};
pub use validation::ValidatedJson;
