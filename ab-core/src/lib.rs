//! Core motor drivers and utilities for the AutoBlinds window-blind actuator
//! on no-std embedded platforms.
//!
//! For a runnable host demo, see the `ab-app/mock-mcu` crate.
#![no_std]

pub mod utils;
