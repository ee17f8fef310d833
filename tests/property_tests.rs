//! Property tests entry point

mod property;
