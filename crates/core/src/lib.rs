//! Core library for jirafmt
//!
//! This crate is the **Functional Core** of jirafmt: pure transformations
//! from Markdown to the two markup flavours Jira accepts, with no I/O.
//! The `jirafmt` binary is the Imperative Shell that reads files, talks to
//! the terminal and prints payloads.
//!
//! # Module Organization
//!
//! - [`markdown`]: the transpiler (line classifier, wiki emitter, ADF tree
//!   builder, inline formatting engine)
//! - [`adf`]: the Atlassian Document Format model and a readable-text renderer
//! - [`atlassian`]: request-body helpers that embed converted output per
//!   Jira REST API version
//!
//! # Example Usage
//!
//! ```rust
//! use jirafmt_core::markdown::{to_structured_document, to_wiki_markup};
//!
//! assert_eq!(to_wiki_markup("# Release notes"), "h1. Release notes");
//!
//! let doc = to_structured_document("[docs](https://example.com)");
//! assert_eq!(doc.to_value()["content"][0]["type"], "paragraph");
//! ```
//!
//! Every call owns its own state, so documents can be converted in parallel
//! from independent threads.

pub mod adf;
pub mod atlassian;
pub mod markdown;
