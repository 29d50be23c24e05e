pub mod check_registry;
pub mod decode;
pub mod encode;
pub mod negotiate;
pub mod paginate;
