pub mod export;
pub mod history;
pub mod identity;
pub mod location;
pub mod lookup;
pub mod session;
