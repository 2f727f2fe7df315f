//! One module per use-case. Services combine domain functions with port
//! calls and take every port as `&impl Trait`.

pub mod collector;
pub mod reconcile;
pub mod rules;
pub mod status;
pub mod stop;
pub mod volume;
