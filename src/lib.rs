//! clinic-admin: membership back-office for a hair-removal clinic, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
