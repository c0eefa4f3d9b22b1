pub mod i18n;
pub mod shutdown;
pub mod types;

pub use i18n::Locale;
pub use shutdown::*;
pub use types::*;
