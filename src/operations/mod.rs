pub mod dispatcher;
pub mod replenishment;
