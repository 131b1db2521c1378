//! # adscout core
//!
//! Evidence-based topology inference over a finished nmap scan.
//!
//! * **[`scan`]**: the scan-result accessor and the queryable [`scan::ScanDocument`].
//! * **[`evidence`]**: typed queries for each kind of evidence.
//! * **[`inference`]**: the cascading domain-resolution strategy chain.
//! * **[`assembler`]** / **[`services`]**: host and service registration.
//! * **[`controller`]**: domain-controller scoring.
//! * **[`explorer`]**: one pass over every host of a scan.
//! * **[`registry`]**: an in-memory registration adapter.

pub mod assembler;
pub mod controller;
pub mod evidence;
pub mod explorer;
pub mod inference;
pub mod registry;
pub mod scan;
pub mod services;
