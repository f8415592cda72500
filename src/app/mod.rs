//! Core application logic: state management, event handling, and action dispatch.

pub mod action;
pub mod catalog;
pub mod event;
pub mod form;
pub mod handler;
pub mod notification;
pub mod route;
pub mod state;
