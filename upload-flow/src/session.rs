//! FlowSession – the submission controller for one flow instance.
//!
//! A session owns the pending [`UploadSelection`], the flow's enrichment flag
//! and the [`RequestState`] of the latest submission. Clones share the same
//! state, so one handle can drive `submit()` while another watches `state()`.
//!
//! At most one submission runs per session. A second `submit()` while the
//! first is loading returns [`SubmissionError::InFlight`] and leaves the state
//! alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    error::{Result, SubmissionError},
    flow::{AnalysisFlow, interpret_reply},
    selection::UploadSelection,
    service::{AnalysisRequest, AnalysisService},
    state::RequestState,
};

/// Message shown when `submit()` is called before any file was chosen.
pub const NO_FILE_SELECTED: &str = "Please select a file";

struct SessionState<T> {
    selection: Option<UploadSelection>,
    flag: bool,
    request: RequestState<T>,
}

type SharedState<T> = Arc<Mutex<SessionState<T>>>;

fn lock<T>(state: &Mutex<SessionState<T>>) -> MutexGuard<'_, SessionState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State machine and request orchestration for a single flow.
pub struct FlowSession<F: AnalysisFlow> {
    flow: Arc<F>,
    service: Arc<dyn AnalysisService>,
    state: SharedState<F::Output>,
}

impl<F: AnalysisFlow> Clone for FlowSession<F> {
    fn clone(&self) -> Self {
        Self {
            flow: self.flow.clone(),
            service: self.service.clone(),
            state: self.state.clone(),
        }
    }
}

impl<F: AnalysisFlow> FlowSession<F> {
    pub fn new(flow: F, service: Arc<dyn AnalysisService>) -> Self {
        Self {
            flow: Arc::new(flow),
            service,
            state: Arc::new(Mutex::new(SessionState {
                selection: None,
                flag: false,
                request: RequestState::Idle,
            })),
        }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// Store a newly chosen file. `None` means the picker or drop carried no
    /// file and nothing changes.
    pub fn select_file(&self, selection: Option<UploadSelection>) {
        let Some(selection) = selection else {
            return;
        };

        let mut state = lock(&self.state);
        info!(flow = self.flow.id(), "Selected file: {}", selection.file_name());
        state.selection = Some(selection);
        if matches!(state.request, RequestState::Failed(_)) {
            state.request = RequestState::Idle;
        }
    }

    pub fn set_flag(&self, enabled: bool) {
        lock(&self.state).flag = enabled;
    }

    pub fn flag(&self) -> bool {
        lock(&self.state).flag
    }

    pub fn file_name(&self) -> Option<String> {
        lock(&self.state)
            .selection
            .as_ref()
            .map(|selection| selection.file_name().to_string())
    }

    /// Snapshot of the current request state.
    pub fn state(&self) -> RequestState<F::Output> {
        lock(&self.state).request.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).request.is_loading()
    }

    /// Submit the selected file to the flow's endpoint.
    ///
    /// Every failure is also recorded as [`RequestState::Failed`], except
    /// [`SubmissionError::InFlight`] which leaves the running submission alone.
    pub async fn submit(&self) -> Result<F::Output> {
        let submission_id = Uuid::new_v4();
        let span = info_span!("submission", flow = self.flow.id(), %submission_id);
        self.run_submission().instrument(span).await
    }

    async fn run_submission(&self) -> Result<F::Output> {
        let (upload, flag) = {
            let mut state = lock(&self.state);

            if state.request.is_loading() {
                warn!("Submission rejected, another one is still loading");
                return Err(SubmissionError::InFlight);
            }

            let Some(upload) = state.selection.clone() else {
                let err = SubmissionError::Validation(NO_FILE_SELECTED.to_string());
                state.request = RequestState::Failed(err.to_string());
                return Err(err);
            };

            state.request = RequestState::Loading;
            (upload, state.flag)
        };

        let guard = LoadingGuard {
            state: self.state.clone(),
            settled: false,
        };

        let request = AnalysisRequest {
            endpoint: self.flow.endpoint(),
            upload: &upload,
            flag_field: self.flow.flag_field(),
            flag,
        };

        let outcome = match self.service.submit(request).await {
            Ok(reply) => interpret_reply(self.flow.as_ref(), &reply),
            Err(e) => Err(SubmissionError::from(e)),
        };

        match &outcome {
            Ok(output) => {
                info!("Analysis of {} succeeded", upload.file_name());
                guard.settle(RequestState::Succeeded(output.clone()));
            }
            Err(e) => {
                error!("Analysis of {} failed: {}", upload.file_name(), e);
                guard.settle(RequestState::Failed(e.to_string()));
            }
        }

        outcome
    }
}

/// Leaves the loading state exactly once, even if the submit future is dropped.
struct LoadingGuard<T> {
    state: SharedState<T>,
    settled: bool,
}

impl<T> LoadingGuard<T> {
    fn settle(mut self, outcome: RequestState<T>) {
        debug!(state = outcome.label(), "Submission settled");
        lock(&self.state).request = outcome;
        self.settled = true;
    }
}

impl<T> Drop for LoadingGuard<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock(&self.state);
        if state.request.is_loading() {
            warn!("Submission dropped before the service answered");
            state.request = RequestState::Idle;
        }
    }
}
