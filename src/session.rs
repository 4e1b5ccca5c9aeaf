// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The single state container of an inspection session.
//!
//! All mutation goes through the methods below, on one thread, with time passed in explicitly.
//! Network work happens elsewhere ([`crate::request::RequestPipeline`]); its results come back as
//! [`Completion`]s and are only applied when they belong to the latest issued request.

use std::time::{Duration, Instant};

use crate::align::AlignmentIndex;
use crate::client::ApiResponse;
use crate::interaction::{Effect, Highlight, InteractionState, Selection, Tooltip, View};
use crate::mode::ModeController;
use crate::model::{Mode, ModelId, Status, StatusKind, Token};
use crate::request::{plan_request, ApiCall, Completion, Plan, RequestOrchestrator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub mode: Mode,
    pub model_id: ModelId,
    pub quiet_period: Duration,
    /// Enter the `progress` status while a call is outstanding.
    pub progress_feedback: bool,
}

impl SessionOptions {
    pub fn new(model_id: ModelId) -> Self {
        Self {
            mode: Mode::default(),
            model_id,
            quiet_period: crate::request::DEFAULT_QUIET_PERIOD,
            progress_feedback: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    controller: ModeController,
    orchestrator: RequestOrchestrator,
    raw_input: String,
    tokens: Vec<Token>,
    decoded_text: String,
    index: AlignmentIndex,
    interaction: InteractionState,
    status: Status,
    progress_feedback: bool,
    status_before_progress: Option<Status>,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let controller = ModeController::new(options.mode, options.model_id);
        let status = controller.ready_status();
        Self {
            controller,
            orchestrator: RequestOrchestrator::new(options.quiet_period),
            raw_input: String::new(),
            tokens: Vec::new(),
            decoded_text: String::new(),
            index: AlignmentIndex::default(),
            interaction: InteractionState::default(),
            status,
            progress_feedback: options.progress_feedback,
            status_before_progress: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn model_id(&self) -> &ModelId {
        self.controller.model_id()
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The text the character view shows.
    ///
    /// In tokenize mode this *is* the raw input, so it can never drift from what the user typed.
    pub fn visualized_text(&self) -> &str {
        match self.mode() {
            Mode::Tokenize => &self.raw_input,
            Mode::Decode => &self.decoded_text,
        }
    }

    pub fn index(&self) -> &AlignmentIndex {
        &self.index
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn selection(&self) -> Selection {
        self.interaction.selection()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.interaction.tooltip()
    }

    /// When the pending debounce fires, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.orchestrator.deadline()
    }

    // --- inputs -------------------------------------------------------------------------------

    pub fn set_input(&mut self, raw_input: impl Into<String>, now: Instant) {
        let raw_input = raw_input.into();
        if raw_input == self.raw_input {
            return;
        }
        self.raw_input = raw_input;
        self.orchestrator.input_changed(now);
        if self.mode() == Mode::Tokenize {
            let char_count = self.raw_input.chars().count();
            self.interaction.resync(&self.tokens, &self.index, char_count);
        }
    }

    /// Switches mode and resets everything derived from the previous one.
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        self.status = self.controller.set_mode(mode);
        self.status_before_progress = None;
        self.raw_input.clear();
        self.replace_content(Vec::new(), String::new());
        self.interaction.reset();
        self.orchestrator.invalidate();
        self.orchestrator.input_changed(now);
        tracing::info!(mode = %mode, model = %self.model_id(), "mode changed");
    }

    pub fn set_model_id(&mut self, model_id: ModelId, now: Instant) {
        self.status = self.controller.set_model_id(model_id);
        self.status_before_progress = None;
        self.orchestrator.invalidate();
        self.orchestrator.input_changed(now);
        tracing::info!(model = %self.model_id(), "model changed");
    }

    /// Re-runs the current inputs after the quiet period even though nothing changed.
    pub fn refresh(&mut self, now: Instant) {
        self.orchestrator.input_changed(now);
    }

    // --- request lifecycle --------------------------------------------------------------------

    /// Settles the debounce if its quiet period has elapsed.
    ///
    /// Clear and skip plans are applied right here; a call plan is returned for dispatch.
    pub fn poll(&mut self, now: Instant) -> Option<ApiCall> {
        if !self.orchestrator.settle(now) {
            return None;
        }

        match plan_request(self.mode(), &self.raw_input, self.controller.model_id()) {
            Plan::Clear => {
                self.orchestrator.invalidate();
                self.replace_content(Vec::new(), String::new());
                self.status_before_progress = None;
                if self.status.kind() != StatusKind::Ready {
                    self.status = Status::ready("Ready");
                }
                None
            }
            Plan::Skip => {
                tracing::debug!("decode input has no usable ids; leaving state untouched");
                None
            }
            Plan::Call(request) => {
                let call = self.orchestrator.issue(request);
                if self.progress_feedback {
                    let message = match self.mode() {
                        Mode::Tokenize => "Tokenizing…",
                        Mode::Decode => "Decoding…",
                    };
                    let previous = std::mem::replace(&mut self.status, Status::progress(message));
                    // Keep the status from before the first outstanding call.
                    if previous.kind() != StatusKind::Progress {
                        self.status_before_progress = Some(previous);
                    }
                }
                Some(call)
            }
        }
    }

    /// Applies a finished call. Returns `false` if it was stale and has been discarded.
    pub fn apply_completion(&mut self, completion: Completion) -> bool {
        if !self.orchestrator.is_current(completion.generation) {
            tracing::debug!(
                generation = %completion.generation,
                latest = %self.orchestrator.latest(),
                "discarding stale response"
            );
            return false;
        }

        match completion.result {
            Ok(response) => {
                // Only a decode response ever supplies text; in tokenize mode the visualized
                // text stays the raw input.
                let decoded_text = match response {
                    ApiResponse::Decoded(ref decoded) if self.mode() == Mode::Decode => {
                        decoded.text.clone()
                    }
                    _ => std::mem::take(&mut self.decoded_text),
                };
                let tokens = match response {
                    ApiResponse::Tokenized(response) => response.tokens,
                    ApiResponse::Decoded(response) => response.tokens,
                };
                self.replace_content(tokens, decoded_text);
                if let Some(previous) = self.status_before_progress.take() {
                    self.status = previous;
                }
            }
            Err(err) => {
                self.status_before_progress = None;
                self.status = Status::error(err.user_message());
            }
        }
        true
    }

    // --- pointer ------------------------------------------------------------------------------

    pub fn pointer_enter_token(&mut self, token_index: usize, x: u16, y: u16) {
        self.interaction.pointer_enter_token(&self.tokens, token_index, x, y);
    }

    pub fn pointer_enter_char(&mut self, char_index: usize, x: u16, y: u16) {
        self.interaction.pointer_enter_char(&self.tokens, &self.index, char_index, x, y);
    }

    pub fn pointer_leave(&mut self, view: View) {
        self.interaction.pointer_leave(view);
    }

    pub fn click_token(&mut self, token_index: usize) -> Option<Effect> {
        self.interaction.click_token(&self.index, token_index)
    }

    pub fn click_char(&mut self, char_index: usize) -> Option<Effect> {
        self.interaction.click_char(&self.index, char_index)
    }

    pub fn click_background(&mut self) {
        self.interaction.click_background();
    }

    pub fn char_highlight(&self, char_index: usize) -> Highlight {
        self.interaction.char_highlight(&self.index, char_index)
    }

    pub fn token_highlight(&self, token_index: usize) -> Highlight {
        self.interaction.token_highlight(token_index)
    }

    pub fn is_char_highlighted(&self, char_index: usize) -> bool {
        self.interaction.is_char_highlighted(&self.index, char_index)
    }

    pub fn is_token_highlighted(&self, token_index: usize) -> bool {
        self.interaction.is_token_highlighted(token_index)
    }

    pub fn is_token_active(&self, token_index: usize) -> bool {
        self.interaction.is_token_active(token_index)
    }

    fn replace_content(&mut self, tokens: Vec<Token>, decoded_text: String) {
        self.index = AlignmentIndex::new(&tokens);
        self.tokens = tokens;
        self.decoded_text = decoded_text;
        let char_count = self.visualized_text().chars().count();
        self.interaction.resync(&self.tokens, &self.index, char_count);
    }
}
