// Application flow controller: upload -> analyzing -> results
//
// The state is a plain value and `reduce` is a pure function over it, so the
// whole flow can be driven without a rendering surface.

use crate::errors::ErrorDescriptor;
use crate::models::{AnalysisRequest, NormalizedResult, RequestId, SelectedImage};
use crate::progress::{ProgressTracker, Stage, StageThresholds};
use crate::symptoms::SymptomSet;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Upload,
    Analyzing,
    Results,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowState {
    pub phase: Phase,
    pub image: Option<SelectedImage>,
    pub symptoms: SymptomSet,
    pub result: Option<NormalizedResult>,
    pub error: Option<ErrorDescriptor>,
    pub progress: ProgressTracker,
    pub stage: Stage,
    pub thresholds: StageThresholds,
    /// Request currently awaited; `Some` exactly while analyzing
    pub in_flight: Option<AnalysisRequest>,
    /// Last submitted request, kept for the retry affordance
    pub last_request: Option<AnalysisRequest>,
    last_id: RequestId,
}

#[derive(Debug, Clone)]
pub enum FlowAction {
    ImageSelected(SelectedImage),
    ImageCleared,
    SymptomsChanged(SymptomSet),
    Submit,
    Progress { request: RequestId, percent: u8 },
    Succeeded { request: RequestId, result: Box<NormalizedResult> },
    Failed { request: RequestId, error: ErrorDescriptor },
    Retry,
    DismissError,
    NewAnalysis,
    Reset,
}

impl FlowState {
    pub fn new(max_symptoms: usize, thresholds: StageThresholds) -> Self {
        Self {
            phase: Phase::Upload,
            image: None,
            symptoms: SymptomSet::new(max_symptoms),
            result: None,
            error: None,
            progress: ProgressTracker::new(),
            stage: Stage::Uploading,
            thresholds,
            in_flight: None,
            last_request: None,
            last_id: RequestId::default(),
        }
    }

    /// Submit is enabled only with an image and nothing in flight
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Upload && self.image.is_some() && self.in_flight.is_none()
    }

    /// Retry is offered when the last request still has its image
    pub fn can_retry(&self) -> bool {
        self.phase == Phase::Upload && self.in_flight.is_none() && self.last_request.is_some()
    }

    /// The request the effect layer should be executing, if any
    pub fn pending_request(&self) -> Option<&AnalysisRequest> {
        self.in_flight.as_ref()
    }

    pub fn reduce(mut self, action: FlowAction) -> Self {
        match action {
            FlowAction::ImageSelected(image) => {
                if self.phase == Phase::Upload {
                    self.image = Some(image);
                    self.error = None;
                    self.last_request = None;
                }
            }
            FlowAction::ImageCleared => {
                if self.phase == Phase::Upload {
                    self.image = None;
                    self.last_request = None;
                }
            }
            FlowAction::SymptomsChanged(symptoms) => {
                if self.phase == Phase::Upload {
                    self.symptoms = symptoms;
                }
            }
            FlowAction::Submit => {
                if self.in_flight.is_some() || self.phase != Phase::Upload {
                    return self.heal();
                }
                match self.image.clone() {
                    Some(image) => {
                        let symptoms = self.symptoms.clone();
                        self.start_request(image, symptoms);
                    }
                    None => {
                        self.error = Some(ErrorDescriptor::validation(&ValidationError::MissingImage));
                    }
                }
            }
            FlowAction::Progress { request, percent } => {
                if self.is_current(request) && self.progress.advance(percent) {
                    self.stage = Stage::from_percent(self.progress.percent(), self.thresholds);
                }
            }
            FlowAction::Succeeded { request, result } => {
                if self.is_current(request) {
                    self.in_flight = None;
                    self.progress.advance(100);
                    self.stage = Stage::Finalizing;
                    self.result = Some(*result);
                    self.error = None;
                    self.phase = Phase::Results;
                }
            }
            FlowAction::Failed { request, error } => {
                if self.is_current(request) {
                    self.in_flight = None;
                    self.progress.reset();
                    self.stage = Stage::Uploading;
                    self.error = Some(error);
                    self.phase = Phase::Upload;
                }
            }
            FlowAction::Retry => {
                if self.can_retry() {
                    if let Some(last) = self.last_request.take() {
                        self.start_request(last.image, last.symptoms);
                    }
                }
            }
            FlowAction::DismissError => {
                self.error = None;
            }
            FlowAction::NewAnalysis => {
                if self.phase == Phase::Results {
                    self = self.cleared();
                }
            }
            FlowAction::Reset => {
                self = self.cleared();
            }
        }
        self.heal()
    }

    fn is_current(&self, request: RequestId) -> bool {
        self.in_flight.as_ref().is_some_and(|r| r.id == request)
    }

    fn start_request(&mut self, image: SelectedImage, symptoms: SymptomSet) {
        self.last_id = self.last_id.next();
        let request = AnalysisRequest {
            id: self.last_id,
            image,
            symptoms,
        };
        self.last_request = Some(request.clone());
        self.in_flight = Some(request);
        self.error = None;
        self.result = None;
        self.progress.reset();
        self.stage = Stage::Uploading;
        self.phase = Phase::Analyzing;
    }

    /// Back to a fresh upload state. The request counter survives so late
    /// responses of discarded requests can never match a new one.
    fn cleared(self) -> Self {
        let mut fresh = Self::new(self.symptoms.max(), self.thresholds);
        fresh.last_id = self.last_id;
        fresh
    }

    /// Correct state drift: `results` needs a result and `analyzing`
    /// needs a request in flight.
    fn heal(mut self) -> Self {
        let drifted = match self.phase {
            Phase::Results => self.result.is_none(),
            Phase::Analyzing => self.in_flight.is_none(),
            Phase::Upload => false,
        };
        if drifted {
            self.phase = Phase::Upload;
            self.in_flight = None;
            self.progress.reset();
            self.stage = Stage::Uploading;
        }
        self
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(crate::symptoms::DEFAULT_MAX_SYMPTOMS, StageThresholds::default())
    }
}
