mod age_group;
mod category;
mod gender;
mod locale;
mod page;
mod profile_error;
mod role;
mod ward;

pub use age_group::{AgeGroup, LifeStage};
pub use category::Category;
pub use gender::Gender;
pub use locale::Locale;
pub use page::Page;
pub use profile_error::ProfileError;
pub use role::Role;
pub use ward::{WardNumber, MAX_WARD};
