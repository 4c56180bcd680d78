//! Front-end state for the satellite / mission control console: the
//! observable language store and the payload types of "show modal" requests.

pub mod config;
pub mod i18n;
pub mod modal;
pub mod storage;
