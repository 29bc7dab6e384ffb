//! jelloweb-web — HTML front end for jello and jc.
//! Serves two form pages:
//!   - `/`   JSON / JSON Lines input + path query → highlighted JSON or schema
//!   - `/jc` command output + parser name → highlighted JSON

pub mod router;
pub mod handlers;
pub mod state;
pub mod forms;
pub mod flash;
pub mod csrf;
pub mod templates;
pub mod error;
