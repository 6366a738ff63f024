//! # Route Modules
//!
//! | Prefix                          | Module            | Access |
//! |---------------------------------|-------------------|--------|
//! | `/v1/registrations`             | [`registration`]  | public |
//! | `/v1/tickets/:ticket_id/badge`  | [`tickets`]       | public |
//! | `/v1/catalog`                   | [`catalog`]       | public |
//! | `/v1/admin/login`               | [`admin`]         | public |
//! | `/v1/admin/participants`        | [`participants`]  | admin  |
//! | `/v1/admin/check-in`            | [`checkin`]       | admin  |
//! | `/v1/admin/{stats,export.csv,sync,roster,logout}` | [`admin`] | admin |

pub mod admin;
pub mod catalog;
pub mod checkin;
pub mod participants;
pub mod registration;
pub mod tickets;
