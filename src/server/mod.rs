//! TCP front end: binds the listen address and hands each accepted socket to
//! its own connection task.

pub mod listener;
