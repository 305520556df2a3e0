pub mod date_record;
pub mod letter;
pub mod map_point;
pub mod record;
pub mod user;

pub use date_record::*;
pub use letter::*;
pub use map_point::*;
pub use record::*;
pub use user::*;
