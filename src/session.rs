//! Prediction session: one applicant form and its latest outcome.
//!
//! A session owns the current input, the last validation report and the
//! held prediction. It moves between three observable phases:
//!
//! ```text
//! Idle ──submit(valid)──▶ Scored ──reset()──▶ Idle
//!   │                       │
//!   └──submit(invalid)──▶ Invalid ◀──submit(invalid)
//! ```
//!
//! Validation and scoring are traced as `validating` and `scoring` spans.
//!
//! Failure policies:
//! - an invalid submission keeps the input for correction and leaves any
//!   held result untouched
//! - a failed prediction clears the held result and returns to `Idle`

use std::fmt;

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::applicant::ApplicantInput;
use crate::classifier::PredictionResult;
use crate::encoder::FeatureEncoder;
use crate::error::{LendError, Result};
use crate::traits::Classifier;
use crate::validation::{validate, ValidationPolicy, ValidationReport};

/// Observable state of a [`PredictionSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionPhase {
    /// Nothing to show
    Idle,
    /// The last submission broke field constraints
    Invalid,
    /// A prediction is held
    Scored,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Invalid => "invalid",
            SessionPhase::Scored => "scored",
        })
    }
}

/// Orchestrates validate → encode → predict for one applicant form.
///
/// # Example
///
/// ```no_run
/// use lendwise::classifier::ClassifierAdapter;
/// use lendwise::session::{PredictionSession, SessionPhase};
///
/// let adapter = ClassifierAdapter::load("gb_model.json", 1)?;
/// let mut session = PredictionSession::new(adapter);
/// session.input_mut().income = 60_000.0;
/// session.input_mut().loan_amount = 15_000.0;
///
/// let result = session.submit()?;
/// println!("{} ({})", result.label, result.approval_percent());
/// assert_eq!(session.phase(), SessionPhase::Scored);
/// # Ok::<(), lendwise::LendError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PredictionSession<C> {
    classifier: C,
    encoder: FeatureEncoder,
    policy: ValidationPolicy,
    input: ApplicantInput,
    result: Option<PredictionResult>,
    violations: Option<ValidationReport>,
}

impl<C: Classifier> PredictionSession<C> {
    /// Creates an idle session with default input and the default policy.
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            encoder: FeatureEncoder::new(),
            policy: ValidationPolicy::default(),
            input: ApplicantInput::default(),
            result: None,
            violations: None,
        }
    }

    /// Replaces the validation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the feature encoder.
    #[must_use]
    pub fn with_encoder(mut self, encoder: FeatureEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// The classifier scoring this session.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Validation policy in effect.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Current form input.
    pub fn input(&self) -> &ApplicantInput {
        &self.input
    }

    /// Mutable form input. Edits do not clear the held result.
    pub fn input_mut(&mut self) -> &mut ApplicantInput {
        &mut self.input
    }

    /// Replaces the whole form input.
    pub fn set_input(&mut self, input: ApplicantInput) {
        self.input = input;
    }

    /// Held prediction, if any.
    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    /// Violations from the last rejected submission.
    pub fn violations(&self) -> Option<&ValidationReport> {
        self.violations.as_ref()
    }

    /// Current phase. Pending violations take precedence over a held result.
    pub fn phase(&self) -> SessionPhase {
        if self.violations.is_some() {
            SessionPhase::Invalid
        } else if self.result.is_some() {
            SessionPhase::Scored
        } else {
            SessionPhase::Idle
        }
    }

    /// Validates the current input and, if it passes, scores it.
    ///
    /// # Errors
    ///
    /// - [`LendError::Validation`] with every violation found; the session
    ///   becomes [`SessionPhase::Invalid`]
    /// - [`LendError::PredictionFailed`] from the classifier; the held result
    ///   is cleared
    pub fn submit(&mut self) -> Result<PredictionResult> {
        {
            let _validating = debug_span!("validating").entered();
            if let Err(report) = validate(&self.input, &self.policy) {
                debug!(violations = report.len(), "submission rejected");
                self.violations = Some(report.clone());
                return Err(LendError::Validation(report));
            }
        }
        self.violations = None;

        let _scoring = debug_span!("scoring").entered();
        let features = self.encoder.encode(&self.input, self.classifier.schema());
        match self.classifier.predict(&features) {
            Ok(result) => {
                self.result = Some(result);
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "prediction failed, clearing held result");
                self.result = None;
                Err(err)
            }
        }
    }

    /// Clears the outcome and restores every field to its default.
    pub fn reset(&mut self) {
        self.input = ApplicantInput::default();
        self.result = None;
        self.violations = None;
        debug!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::applicant::{Education, HomeOwnership, LoanIntent};
    use crate::encoder::FeatureVector;
    use crate::schema::FeatureSchema;
    use crate::validation::Violation;
    use crate::vocabulary::Vocabulary;

    /// Approves any applicant with a credit score above 600, or fails on
    /// demand.
    struct ScoreGate {
        schema: FeatureSchema,
        fail: Cell<bool>,
        calls: Cell<usize>,
    }

    impl ScoreGate {
        fn new() -> Self {
            Self {
                schema: FeatureSchema::from_names(
                    ["person_income", "credit_score", "loan_percent_income"],
                    &Vocabulary::TRAINED,
                )
                .expect("valid names"),
                fail: Cell::new(false),
                calls: Cell::new(0),
            }
        }
    }

    impl Classifier for ScoreGate {
        fn schema(&self) -> &FeatureSchema {
            &self.schema
        }

        fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(LendError::prediction_failed("model unavailable"));
            }
            let score = features.get("credit_score").unwrap_or(0.0);
            let p = if score > 600.0 { 0.8 } else { 0.1 };
            Ok(PredictionResult::from_approval_probability(p))
        }
    }

    fn scenario_a(session: &mut PredictionSession<&ScoreGate>) {
        let input = session.input_mut();
        input.age = 30;
        input.income = 60_000.0;
        input.employment_experience = 8;
        input.loan_amount = 15_000.0;
    }

    #[test]
    fn test_new_session_is_idle_with_defaults() {
        let gate = ScoreGate::new();
        let session = PredictionSession::new(&gate);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.input(), &ApplicantInput::default());
        assert!(session.result().is_none());
        assert!(session.violations().is_none());
        assert_eq!(session.policy(), &ValidationPolicy::default());
    }

    #[test]
    fn test_valid_submission_is_scored() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        scenario_a(&mut session);

        let result = session.submit().expect("valid input");
        assert!(result.is_approved());
        assert_eq!(session.phase(), SessionPhase::Scored);
        assert_eq!(session.result(), Some(&result));
        assert_eq!(gate.calls.get(), 1);
    }

    #[test]
    fn test_invalid_submission_never_reaches_classifier() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        session.input_mut().age = 20;
        session.input_mut().employment_experience = 10;
        session.input_mut().credit_history_length = 2;

        let err = session.submit().unwrap_err();
        let report = err.violations().expect("validation error");
        assert_eq!(
            report.violations(),
            &[Violation::ExperienceExceedsWorkingYears {
                experience: 10,
                working_years: 4,
                min_working_age: 16,
            }]
        );
        assert_eq!(session.phase(), SessionPhase::Invalid);
        assert_eq!(session.violations(), Some(report));
        assert_eq!(session.input().employment_experience, 10);
        assert_eq!(gate.calls.get(), 0);
    }

    #[test]
    fn test_invalid_submission_keeps_held_result() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        scenario_a(&mut session);
        let held = session.submit().expect("valid input");

        session.input_mut().loan_amount = 100.0;
        assert!(session.submit().is_err());
        assert_eq!(session.phase(), SessionPhase::Invalid);
        assert_eq!(session.result(), Some(&held));
    }

    #[test]
    fn test_correction_clears_violations() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        session.input_mut().loan_amount = 0.0;
        assert!(session.submit().is_err());

        session.input_mut().loan_amount = 800.0;
        session.submit().expect("corrected input");
        assert!(session.violations().is_none());
        assert_eq!(session.phase(), SessionPhase::Scored);
    }

    #[test]
    fn test_new_result_replaces_old() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        scenario_a(&mut session);
        let first = session.submit().expect("valid input");

        session.input_mut().credit_score = 450;
        let second = session.submit().expect("valid input");
        assert_ne!(first.label, second.label);
        assert_eq!(session.result(), Some(&second));
    }

    #[test]
    fn test_prediction_failure_clears_result() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        scenario_a(&mut session);
        session.submit().expect("valid input");

        gate.fail.set(true);
        let err = session.submit().unwrap_err();
        assert!(matches!(err, LendError::PredictionFailed { .. }));
        assert!(session.result().is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_reset_after_scored_restores_defaults() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        scenario_a(&mut session);
        session.input_mut().education = Education::Doctorate;
        session.input_mut().home_ownership = HomeOwnership::Mortgage;
        session.input_mut().loan_intent = LoanIntent::Venture;
        session.input_mut().previous_defaults = true;
        session.submit().expect("valid input");
        assert_eq!(session.phase(), SessionPhase::Scored);

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.result().is_none());
        assert_eq!(session.input(), &ApplicantInput::default());
    }

    #[test]
    fn test_reset_clears_violations() {
        let gate = ScoreGate::new();
        let mut session = PredictionSession::new(&gate);
        session.input_mut().credit_score = 200;
        assert!(session.submit().is_err());

        session.reset();
        assert!(session.violations().is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_lenient_policy_skips_ratio_rule() {
        let gate = ScoreGate::new();
        let mut strict = PredictionSession::new(&gate);
        strict.input_mut().loan_amount = 5_000.0;
        assert!(strict.submit().is_err());

        let mut lenient = PredictionSession::new(&gate).with_policy(ValidationPolicy::lenient());
        lenient.input_mut().loan_amount = 5_000.0;
        assert!(lenient.submit().is_ok());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SessionPhase::Idle.to_string(), "idle");
        assert_eq!(SessionPhase::Invalid.to_string(), "invalid");
        assert_eq!(SessionPhase::Scored.to_string(), "scored");
    }
}
