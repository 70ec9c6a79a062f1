// Copyright 2026 Pagefeed Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pagefeed library — scrape one public page into an RSS 2.0 feed.
//!
//! This library crate exposes the pipeline modules for integration testing.

pub mod config;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod pipeline;
pub mod rss;
