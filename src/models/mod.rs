pub mod forms;
pub mod role;
pub mod session;

pub use forms::{AuthorProfileRequest, BookQuery, Credentials, RegistrationForm};
pub use role::Role;
pub use session::{RecordError, SessionRecord};
