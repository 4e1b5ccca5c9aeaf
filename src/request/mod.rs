// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tokscope-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tokscope and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced, mode-aware request orchestration.
//!
//! The orchestrator owns the debounce deadline and the request generation counter. It is a plain
//! state machine driven with explicit `Instant`s; the async side lives in [`pipeline`].
//!
//! Every change to the mode, the model or the raw input restarts the quiet period. When the
//! period elapses the current inputs are turned into a [`Plan`]. Calls are tagged with a
//! [`Generation`] so that a completion can be checked against the latest issued request before
//! it is applied.

use std::fmt;
use std::time::{Duration, Instant};

use crate::client::{ApiRequest, ApiResponse, DecodeRequest, TokenizeRequest};
use crate::error::RequestError;
use crate::model::{Mode, ModelId};

pub mod parse;
pub mod pipeline;

pub use parse::parse_token_ids;
pub use pipeline::RequestPipeline;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Monotonically increasing request tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a settled input turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Input is empty: drop tokens and visualized text without calling the service.
    Clear,
    /// Decode input that sanitizes to no ids: leave everything as it is.
    Skip,
    Call(ApiRequest),
}

pub fn plan_request(mode: Mode, raw_input: &str, model_id: &ModelId) -> Plan {
    if raw_input.is_empty() {
        return Plan::Clear;
    }

    match mode {
        Mode::Tokenize => Plan::Call(ApiRequest::Tokenize(TokenizeRequest {
            text: raw_input.to_owned(),
            model_id: model_id.clone(),
        })),
        Mode::Decode => {
            let ids = parse_token_ids(raw_input);
            if !ids.is_empty() {
                Plan::Call(ApiRequest::Decode(DecodeRequest { ids, model_id: model_id.clone() }))
            } else if raw_input.trim().is_empty() {
                Plan::Clear
            } else {
                Plan::Skip
            }
        }
    }
}

/// A request ready to be sent, tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub generation: Generation,
    pub request: ApiRequest,
}

/// Result of an [`ApiCall`], handed back to the session owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub generation: Generation,
    pub result: Result<ApiResponse, RequestError>,
}

#[derive(Debug, Clone)]
pub struct RequestOrchestrator {
    quiet_period: Duration,
    deadline: Option<Instant>,
    latest: Generation,
}

impl Default for RequestOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl RequestOrchestrator {
    pub fn new(quiet_period: Duration) -> Self {
        Self { quiet_period, deadline: None, latest: Generation::default() }
    }

    /// Cancels any pending deadline and starts a fresh quiet period at `now`.
    pub fn input_changed(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline if it has elapsed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Makes every outstanding call stale.
    pub fn invalidate(&mut self) -> Generation {
        self.latest = self.latest.next();
        self.latest
    }

    pub fn issue(&mut self, request: ApiRequest) -> ApiCall {
        ApiCall { generation: self.invalidate(), request }
    }

    pub fn latest(&self) -> Generation {
        self.latest
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.latest
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{plan_request, Plan, RequestOrchestrator};
    use crate::client::{ApiRequest, DecodeRequest, TokenizeRequest};
    use crate::model::{Mode, ModelId};

    fn model() -> ModelId {
        ModelId::new("M").expect("model id")
    }

    #[test]
    fn tokenize_plan_carries_raw_text_verbatim() {
        assert_eq!(
            plan_request(Mode::Tokenize, "Hello world.", &model()),
            Plan::Call(ApiRequest::Tokenize(TokenizeRequest {
                text: "Hello world.".to_owned(),
                model_id: model(),
            }))
        );
        // Whitespace is real input in tokenize mode.
        assert!(matches!(plan_request(Mode::Tokenize, "  ", &model()), Plan::Call(_)));
    }

    #[test]
    fn decode_plan_parses_ids() {
        assert_eq!(
            plan_request(Mode::Decode, "101, 7592, 102}", &model()),
            Plan::Call(ApiRequest::Decode(DecodeRequest {
                ids: vec![101, 7592, 102],
                model_id: model(),
            }))
        );
    }

    #[test]
    fn empty_input_clears_in_both_modes() {
        assert_eq!(plan_request(Mode::Tokenize, "", &model()), Plan::Clear);
        assert_eq!(plan_request(Mode::Decode, "", &model()), Plan::Clear);
        assert_eq!(plan_request(Mode::Decode, " \n", &model()), Plan::Clear);
    }

    #[test]
    fn unusable_decode_input_is_skipped() {
        assert_eq!(plan_request(Mode::Decode, "abc,", &model()), Plan::Skip);
    }

    #[test]
    fn changes_inside_window_restart_the_deadline() {
        let t0 = Instant::now();
        let mut orchestrator = RequestOrchestrator::new(Duration::from_millis(500));

        orchestrator.input_changed(t0);
        orchestrator.input_changed(t0 + Duration::from_millis(300));
        assert!(!orchestrator.settle(t0 + Duration::from_millis(500)));
        assert!(!orchestrator.settle(t0 + Duration::from_millis(799)));
        assert!(orchestrator.settle(t0 + Duration::from_millis(800)));
        assert!(!orchestrator.settle(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn only_latest_generation_is_current() {
        let mut orchestrator = RequestOrchestrator::default();
        let a = orchestrator.issue(ApiRequest::Tokenize(TokenizeRequest {
            text: "a".to_owned(),
            model_id: model(),
        }));
        let b = orchestrator.issue(ApiRequest::Tokenize(TokenizeRequest {
            text: "a".to_owned(),
            model_id: model(),
        }));

        assert!(a.generation < b.generation);
        assert!(!orchestrator.is_current(a.generation));
        assert!(orchestrator.is_current(b.generation));

        orchestrator.invalidate();
        assert!(!orchestrator.is_current(b.generation));
    }
}
