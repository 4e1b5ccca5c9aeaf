// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tokscope: inspect how a tokenizer service splits text into tokens.
//!
//! The engine is UI-agnostic. [`session::Session`] holds all state and is driven by explicit
//! inputs (text, mode, model, pointer events, clock ticks, completions).
//! [`request::RequestPipeline`] runs the calls it emits. [`tui`] is the terminal front end.

pub mod align;
pub mod client;
pub mod config;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod mode;
pub mod model;
pub mod request;
pub mod session;
pub mod tui;
