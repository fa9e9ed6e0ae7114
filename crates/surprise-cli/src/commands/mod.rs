pub mod config;
pub mod countdown;
pub mod guestbook;
pub mod teaser;
