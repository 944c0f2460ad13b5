//! Presentation pages. All session logic lives in `state/` and `net/`;
//! these only bind form fields to the async operations.

pub mod dashboard;
pub mod login;
pub mod not_found;
pub mod register;
pub mod verify_email;
