//! Chronicle
//!
//! Places the non-fiction books a reader has finished on a zoomable
//! historical timeline. Books come from bibliographic lookup or CSV exports,
//! a language model judges the historical period each one covers, and the
//! terminal viewer stacks them as cards over era bands.
//!
//! The pure core ([`timeline`], [`era`]) does the layout and classification
//! bookkeeping; [`service`], [`library`] and [`view`] form the impure shell.

pub mod app;
pub mod config;
pub mod era;
pub mod import;
pub mod library;
pub mod logging;
pub mod model;
pub mod service;
pub mod timeline;
pub mod view;
