pub mod authenticate;
pub mod cast_vote;
pub mod register;
pub mod throttle;
