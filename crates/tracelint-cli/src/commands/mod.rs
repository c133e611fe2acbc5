//! Command implementations.

pub mod check;
pub mod defaults;
pub mod neighborhood;
pub mod validate;

pub use self::check::{execute_check, render_check};
pub use self::defaults::{execute_defaults, render_defaults};
pub use self::neighborhood::{execute_neighborhood, render_neighborhood};
pub use self::validate::{execute_validate, render_validate};
