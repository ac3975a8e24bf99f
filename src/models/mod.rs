pub mod enums;
pub mod lookup;
pub mod patient;
pub mod payment;
pub mod reservation;
pub mod service_record;
pub mod staff;
pub mod user;

pub use lookup::*;
pub use patient::*;
pub use payment::*;
pub use reservation::*;
pub use service_record::*;
pub use staff::*;
pub use user::*;
