pub mod credentials;
pub mod policy;
pub mod quota;
pub mod seed;
pub mod token_service;
pub mod validation;
