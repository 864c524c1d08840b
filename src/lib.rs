//! Main crate for the `soliddns-webhook` application, an
//! [external-dns](https://github.com/kubernetes-sigs/external-dns) webhook
//! provider for the EfficientIP SOLIDserver DNS appliance.
//!
//! The crate translates between the controller's canonical endpoint model and
//! the flat resource-record rows served by the appliance REST API.
//! The following modules might be of interest:
//! - [`endpoint`] contains the canonical record model and the change batch format
//! - [`provider`] exposes the controller-facing operations and their SolidDNS implementation
//! - [`filter`] narrows the set of zones the provider operates on
//! - [`config`] carries all appliance settings as an explicit parameter struct

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod endpoint;
pub mod filter;
pub mod provider;
