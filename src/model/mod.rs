// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Tokens and their character spans, the conversion mode, the model identifier and the
//! user-visible request status.

pub mod ids;
pub mod mode;
pub mod status;
pub mod token;

pub use ids::{ModelId, ModelIdError};
pub use mode::{Mode, ParseModeError};
pub use status::{Status, StatusKind};
pub use token::{Token, TokenSpan};
