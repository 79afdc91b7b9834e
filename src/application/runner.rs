//! Prediction task runner.
//!
//! Sequences one prediction at a time: show the busy indicator, score the
//! record on a worker thread, hand the outcome back to the UI thread, hide
//! the indicator. Requests arriving while a prediction is in flight are
//! ignored rather than queued.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::domain::{FeatureRecord, PredictionResult};
use crate::ports::Predictor;
use crate::RiskError;

use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Label shown while the startup splash is up.
pub const LOADING_LABEL: &str = "Loading...";
/// Label shown while a prediction is in flight.
pub const PREDICTING_LABEL: &str = "Predicting...";

/// Task runner lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Startup splash; predictions are not accepted yet
    Starting,
    Idle,
    /// A prediction is in flight
    Busy,
    /// Outcome handed back; returns to `Idle` on the next tick
    Done,
}

/// What happened to a predict request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    Dispatched,
    /// Dropped because the runner was starting up or already busy
    Ignored,
}

/// Outcome of a dispatched prediction.
#[derive(Debug)]
pub enum Completion {
    Succeeded(PredictionResult),
    Failed(RiskError),
}

/// Cosmetic busy indicator.
///
/// The counter advances one step per tick period and wraps at 100. It does
/// not measure real progress.
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    visible: bool,
    label: &'static str,
    progress: u8,
    period: Duration,
    last_tick: Option<Instant>,
}

impl BusyIndicator {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            visible: false,
            label: "",
            progress: 0,
            period,
            last_tick: None,
        }
    }

    fn show(&mut self, label: &'static str, now: Instant) {
        self.visible = true;
        self.label = label;
        self.progress = 0;
        self.last_tick = Some(now);
    }

    fn hide(&mut self) {
        self.visible = false;
        self.last_tick = None;
    }

    /// Advance the counter by `steps`, wrapping at 100.
    pub fn advance(&mut self, steps: u64) {
        self.progress = ((u64::from(self.progress) + steps % 100) % 100) as u8;
    }

    /// Advance by the number of whole periods elapsed since the last tick.
    pub fn tick(&mut self, now: Instant) {
        if !self.visible || self.period.is_zero() {
            return;
        }
        let Some(last) = self.last_tick else {
            return;
        };

        let elapsed = now.saturating_duration_since(last);
        let period = self.period.as_nanos();
        let steps = elapsed.as_nanos() / period;
        if steps == 0 {
            return;
        }

        self.advance((steps % 100) as u64);

        // Carry the partial period over to the next tick.
        let remainder = Duration::from_nanos((elapsed.as_nanos() % period) as u64);
        self.last_tick = Some(now.checked_sub(remainder).unwrap_or(now));
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current counter value, always below 100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }
}

/// Single-flight prediction runner.
pub struct TaskRunner {
    predictor: Option<Arc<dyn Predictor>>,
    state: RunnerState,
    indicator: BusyIndicator,
    pending: Option<PredictionWorkerHandle>,
    dispatch_delay: Duration,
    startup_until: Option<Instant>,
}

impl TaskRunner {
    /// Create a runner around an optional predictor handle.
    ///
    /// `None` means the model failed to load; every request will then be
    /// rejected with [`RiskError::ModelUnavailable`].
    #[must_use]
    pub fn new(predictor: Option<Arc<dyn Predictor>>, config: &AppConfig) -> Self {
        Self {
            predictor,
            state: RunnerState::Idle,
            indicator: BusyIndicator::new(config.indicator_tick),
            pending: None,
            dispatch_delay: config.dispatch_delay,
            startup_until: None,
        }
    }

    /// Show the loading splash for `duration`.
    pub fn begin_startup(&mut self, now: Instant, duration: Duration) {
        self.state = RunnerState::Starting;
        self.startup_until = Some(now + duration);
        self.indicator.show(LOADING_LABEL, now);
    }

    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state == RunnerState::Busy
    }

    #[must_use]
    pub fn has_predictor(&self) -> bool {
        self.predictor.is_some()
    }

    /// Description of the loaded predictor, if any.
    #[must_use]
    pub fn predictor_description(&self) -> Option<String> {
        self.predictor.as_ref().map(|p| p.describe())
    }

    #[must_use]
    pub fn indicator(&self) -> &BusyIndicator {
        &self.indicator
    }

    /// Advance the indicator animation, settle a finished prediction and
    /// end the splash when due.
    pub fn tick(&mut self, now: Instant) {
        self.indicator.tick(now);

        if self.state == RunnerState::Done {
            self.state = RunnerState::Idle;
        }

        if self.state == RunnerState::Starting
            && self.startup_until.is_some_and(|until| now >= until)
        {
            self.state = RunnerState::Idle;
            self.startup_until = None;
            self.indicator.hide();
            tracing::info!("Startup splash finished");
        }
    }

    /// Request a prediction for `record`.
    ///
    /// # Errors
    /// Returns `RiskError::ModelUnavailable` if no predictor is loaded; the
    /// predictor is not invoked.
    pub fn request(&mut self, record: FeatureRecord, now: Instant) -> Result<Submit, RiskError> {
        match self.state {
            RunnerState::Starting => {
                tracing::debug!("Predict request during startup ignored");
                return Ok(Submit::Ignored);
            }
            RunnerState::Busy => {
                tracing::debug!("Prediction already in flight; request ignored");
                return Ok(Submit::Ignored);
            }
            RunnerState::Idle | RunnerState::Done => {}
        }

        let Some(predictor) = self.predictor.clone() else {
            tracing::warn!("Predict requested but no model is loaded");
            return Err(RiskError::ModelUnavailable);
        };

        self.state = RunnerState::Busy;
        self.indicator.show(PREDICTING_LABEL, now);
        self.pending = Some(PredictionWorker::spawn(predictor, record, self.dispatch_delay));

        tracing::info!("Prediction dispatched");
        Ok(Submit::Dispatched)
    }

    /// Poll the in-flight prediction.
    ///
    /// Returns the outcome once, when the prediction finishes, leaving the
    /// runner in `Done`. A `Done` runner accepts new requests.
    pub fn poll(&mut self) -> Option<Completion> {
        // NOTE: the worker borrow must end before `finish` mutates `self`.
        loop {
            let progress = self.pending.as_ref()?.try_recv()?;

            match progress {
                PredictionProgress::Scoring => {
                    tracing::debug!("Predictor invoked");
                }
                PredictionProgress::Complete(category) => {
                    let result = PredictionResult::from_category(category);
                    tracing::info!(
                        "Prediction complete: category={}, danger_level={}",
                        result.category,
                        result.danger_level
                    );
                    return Some(self.finish(Completion::Succeeded(result)));
                }
                PredictionProgress::Failed(e) => {
                    tracing::warn!("Prediction failed: {}", e);
                    return Some(self.finish(Completion::Failed(RiskError::PredictionFailed(
                        e.to_string(),
                    ))));
                }
            }
        }
    }

    fn finish(&mut self, completion: Completion) -> Completion {
        self.state = RunnerState::Done;
        self.pending = None;
        self.indicator.hide();
        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PredictorError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};

    struct FakePredictor {
        calls: AtomicUsize,
        answer: Result<String, PredictorError>,
        gate: Option<Mutex<mpsc::Receiver<()>>>,
    }

    impl FakePredictor {
        fn answering(answer: Result<String, PredictorError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer,
                gate: None,
            })
        }

        fn gated(answer: &str) -> (Arc<Self>, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let fake = Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer: Ok(answer.to_string()),
                gate: Some(Mutex::new(rx)),
            });
            (fake, tx)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Predictor for FakePredictor {
        fn predict(&self, _record: &FeatureRecord) -> Result<String, PredictorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                let _ = gate.lock().expect("gate lock").recv();
            }
            self.answer.clone()
        }
    }

    struct PanickingPredictor;

    impl Predictor for PanickingPredictor {
        fn predict(&self, _record: &FeatureRecord) -> Result<String, PredictorError> {
            panic!("model runtime crashed");
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            dispatch_delay: Duration::ZERO,
            ..AppConfig::default()
        }
    }

    fn runner_with(predictor: Option<Arc<dyn Predictor>>) -> TaskRunner {
        TaskRunner::new(predictor, &test_config())
    }

    fn wait_for_completion(runner: &mut TaskRunner) -> Completion {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(completion) = runner.poll() {
                return completion;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("prediction did not complete in time");
    }

    #[test]
    fn test_successful_prediction() {
        let fake = FakePredictor::answering(Ok("Normal".into()));
        let mut runner = runner_with(Some(fake.clone()));

        let submit = runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("request");
        assert_eq!(submit, Submit::Dispatched);
        assert!(runner.is_busy());
        assert!(runner.indicator().is_visible());
        assert_eq!(runner.indicator().label(), PREDICTING_LABEL);

        match wait_for_completion(&mut runner) {
            Completion::Succeeded(result) => {
                assert_eq!(result.category, "Normal");
                assert_eq!(result.danger_level, crate::DangerLevel::Low);
            }
            Completion::Failed(e) => panic!("unexpected failure: {e}"),
        }

        assert_eq!(runner.state(), RunnerState::Done);
        assert!(!runner.indicator().is_visible());
        assert_eq!(fake.calls(), 1);
        assert!(runner.poll().is_none());

        runner.tick(Instant::now());
        assert_eq!(runner.state(), RunnerState::Idle);
    }

    #[test]
    fn test_failed_prediction_clears_busy_state() {
        let fake = FakePredictor::answering(Err(PredictorError::Scoring("boom".into())));
        let mut runner = runner_with(Some(fake.clone()));

        runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("request");

        match wait_for_completion(&mut runner) {
            Completion::Failed(RiskError::PredictionFailed(message)) => {
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected completion: {other:?}"),
        }
        assert_eq!(runner.state(), RunnerState::Done);
        assert!(!runner.indicator().is_visible());

        // A fresh request is accepted straight from `Done`.
        let submit = runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("request");
        assert_eq!(submit, Submit::Dispatched);
        let _ = wait_for_completion(&mut runner);
        assert_eq!(fake.calls(), 2);
    }

    #[test]
    fn test_second_request_while_busy_is_ignored() {
        let (fake, release) = FakePredictor::gated("Moderate");
        let mut runner = runner_with(Some(fake.clone()));

        let first = runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("first request");
        let second = runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("second request");
        assert_eq!(first, Submit::Dispatched);
        assert_eq!(second, Submit::Ignored);
        assert!(runner.is_busy());

        release.send(()).expect("release predictor");
        let completion = wait_for_completion(&mut runner);
        assert!(matches!(completion, Completion::Succeeded(_)));
        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn test_missing_model_rejects_every_request() {
        let mut runner = runner_with(None);
        assert!(!runner.has_predictor());

        for _ in 0..3 {
            let err = runner
                .request(FeatureRecord::default(), Instant::now())
                .unwrap_err();
            assert!(matches!(err, RiskError::ModelUnavailable));
            assert_eq!(runner.state(), RunnerState::Idle);
            assert!(!runner.indicator().is_visible());
            assert!(runner.poll().is_none());
        }
    }

    #[test]
    fn test_worker_crash_is_reported() {
        let mut runner = runner_with(Some(Arc::new(PanickingPredictor)));
        runner
            .request(FeatureRecord::default(), Instant::now())
            .expect("request");

        match wait_for_completion(&mut runner) {
            Completion::Failed(RiskError::PredictionFailed(message)) => {
                assert!(message.contains("terminated unexpectedly"));
            }
            other => panic!("unexpected completion: {other:?}"),
        }
        assert_eq!(runner.state(), RunnerState::Done);
    }

    #[test]
    fn test_startup_splash() {
        let fake = FakePredictor::answering(Ok("Normal".into()));
        let mut runner = runner_with(Some(fake.clone()));
        let start = Instant::now();

        runner.begin_startup(start, Duration::from_millis(2000));
        assert_eq!(runner.state(), RunnerState::Starting);
        assert_eq!(runner.indicator().label(), LOADING_LABEL);

        let submit = runner
            .request(FeatureRecord::default(), start)
            .expect("request");
        assert_eq!(submit, Submit::Ignored);
        assert_eq!(fake.calls(), 0);

        runner.tick(start + Duration::from_millis(1999));
        assert_eq!(runner.state(), RunnerState::Starting);
        assert!(runner.indicator().is_visible());

        runner.tick(start + Duration::from_millis(2000));
        assert_eq!(runner.state(), RunnerState::Idle);
        assert!(!runner.indicator().is_visible());
    }

    #[test]
    fn test_indicator_ticks_and_wraps() {
        let mut indicator = BusyIndicator::new(Duration::from_millis(30));
        let start = Instant::now();

        // Hidden indicators do not move.
        indicator.tick(start + Duration::from_secs(1));
        assert_eq!(indicator.progress(), 0);

        indicator.show(PREDICTING_LABEL, start);
        indicator.tick(start + Duration::from_millis(95));
        assert_eq!(indicator.progress(), 3);

        // The 5 ms remainder carries over.
        indicator.tick(start + Duration::from_millis(120));
        assert_eq!(indicator.progress(), 4);

        indicator.advance(95);
        assert_eq!(indicator.progress(), 99);
        indicator.advance(1);
        assert_eq!(indicator.progress(), 0);

        indicator.tick(start + Duration::from_secs(3600));
        assert!(indicator.progress() < 100);
    }
}
