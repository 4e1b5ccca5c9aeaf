// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mode and model selection.
//!
//! The controller only tracks *which* conversion is active and against which model; the reset of
//! derived state on a mode switch is carried out by [`crate::session::Session`], which owns that
//! state.

use crate::model::{Mode, ModelId, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
    model_id: ModelId,
}

impl ModeController {
    pub fn new(mode: Mode, model_id: ModelId) -> Self {
        Self { mode, model_id }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    /// Switches mode and returns the status to install.
    pub fn set_mode(&mut self, mode: Mode) -> Status {
        self.mode = mode;
        self.ready_status()
    }

    /// Switches model and returns the status to install.
    pub fn set_model_id(&mut self, model_id: ModelId) -> Status {
        self.model_id = model_id;
        Status::ready(format!("Model set to {}", self.model_id))
    }

    pub fn ready_status(&self) -> Status {
        Status::ready(format!("Ready: {} with {}", self.mode, self.model_id))
    }
}
