pub mod user_id;
pub mod email;
pub mod display_name;
pub mod rfid_tag;

pub use user_id::UserId;
pub use email::Email;
pub use display_name::DisplayName;
pub use rfid_tag::RfidTag;
