//! End-to-end schedule generation for one student.
//!
//! # Pipeline
//!
//! catalog index → eligibility filter → chain scorer → priority engine →
//! builder (with validator) → final validator pass → metrics.
//!
//! Expected failures (bad input, nothing satisfiable) come back as
//! [`Outcome::Failed`]; only corrupt intermediate state is an `Err`.

use serde::{Deserialize, Serialize};

use super::builder::{AttemptReport, ScheduleBuilder};
use crate::catalog::CatalogIndex;
use crate::chain::ChainScorer;
use crate::config::GeneratorConfig;
use crate::documents::GenerationRequest;
use crate::eligibility::EligibilityFilter;
use crate::error::GenerationError;
use crate::metrics::ScheduleMetrics;
use crate::models::Schedule;
use crate::priority::{PriorityContext, PriorityEngine};
use crate::trace::{Phase, RunTrace};
use crate::validation::{validate_catalog, validate_preferences, validate_schedule, ScheduleValidation};

/// Why generation produced no schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The request itself is unusable (missing preferences, out-of-range
    /// target, empty catalog, nothing offered).
    InvalidInput,
    /// No credit target yields a schedule satisfying every hard constraint,
    /// or a failed course has no section this semester.
    Unsatisfiable,
}

/// A structured, expected generation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Per-target build attempts (empty for input failures).
    pub attempts: Vec<AttemptReport>,
}

impl GenerationFailure {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::InvalidInput,
            message: message.into(),
            attempts: Vec::new(),
        }
    }

    fn unsatisfiable(message: impl Into<String>, attempts: Vec<AttemptReport>) -> Self {
        Self {
            kind: FailureKind::Unsatisfiable,
            message: message.into(),
            attempts,
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Generated {
        schedule: Schedule,
        metrics: ScheduleMetrics,
        validation: ScheduleValidation,
    },
    Failed(GenerationFailure),
}

/// Outcome plus the run's diagnostic trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub outcome: Outcome,
    pub trace: RunTrace,
}

impl GenerationReport {
    pub fn is_generated(&self) -> bool {
        matches!(self.outcome, Outcome::Generated { .. })
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        match &self.outcome {
            Outcome::Generated { schedule, .. } => Some(schedule),
            Outcome::Failed(_) => None,
        }
    }

    pub fn metrics(&self) -> Option<&ScheduleMetrics> {
        match &self.outcome {
            Outcome::Generated { metrics, .. } => Some(metrics),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&GenerationFailure> {
        match &self.outcome {
            Outcome::Failed(failure) => Some(failure),
            Outcome::Generated { .. } => None,
        }
    }

    /// Consumes the report, returning the schedule if one was generated.
    pub fn into_schedule(self) -> Option<Schedule> {
        match self.outcome {
            Outcome::Generated { schedule, .. } => Some(schedule),
            Outcome::Failed(_) => None,
        }
    }
}

/// Semester schedule generator.
///
/// Stateless between calls: every run builds its own index, chain memo and
/// trace, so one generator may serve many students concurrently.
///
/// # Example
/// ```
/// use course_scheduler::documents::{GenerationRequest, SectionOffering};
/// use course_scheduler::models::*;
/// use course_scheduler::scheduler::{FailureKind, ScheduleGenerator};
///
/// let semester = Semester::new(2024, Term::First);
/// let request = GenerationRequest::new(
///     vec![Course::new("CS101", Category::MajorMandatory).with_credits(3)],
///     SectionOffering::new(semester).with_sections("CS101", vec![Section::new("1")]),
///     StudentRecord::new("s1"),
///     Preferences::new(20),
/// );
///
/// let report = ScheduleGenerator::default().generate(&request).unwrap();
/// assert_eq!(report.failure().unwrap().kind, FailureKind::InvalidInput);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    config: GeneratorConfig,
    engine: PriorityEngine,
}

impl ScheduleGenerator {
    /// Creates a generator with the standard priority rules.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            engine: PriorityEngine::standard(),
        }
    }

    /// Replaces the priority engine.
    pub fn with_priority_engine(mut self, engine: PriorityEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a schedule for the request.
    ///
    /// # Errors
    /// [`GenerationError::Internal`] if intermediate state turns out
    /// inconsistent (for example the builder produced a schedule the final
    /// validator rejects).
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationReport, GenerationError> {
        let mut trace = RunTrace::new(request.student.id.clone());
        let outcome = self.run(request, &mut trace)?;
        match &outcome {
            Outcome::Generated { schedule, metrics, .. } => trace.info(
                Phase::Metrics,
                format!("generated {} credits: {}", schedule.total_credits(), metrics.summary()),
            ),
            Outcome::Failed(failure) => trace.warn(Phase::Build, format!("generation failed: {}", failure.message)),
        }
        Ok(GenerationReport { outcome, trace })
    }

    /// Parses a combined JSON request and generates.
    pub fn generate_json(&self, json: &str) -> Result<GenerationReport, GenerationError> {
        let request = GenerationRequest::from_json(json)?;
        self.generate(&request)
    }

    fn run(&self, request: &GenerationRequest, trace: &mut RunTrace) -> Result<Outcome, GenerationError> {
        let config = &self.config;
        let student = &request.student;
        let semester = request.offering.semester;

        let Some(preferences) = request.preferences.as_ref() else {
            return Ok(Outcome::Failed(GenerationFailure::invalid_input(
                "student preferences are missing",
            )));
        };
        if let Err(errors) = validate_preferences(preferences, config) {
            let message = errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
            return Ok(Outcome::Failed(GenerationFailure::invalid_input(message)));
        }

        if let Err(findings) = validate_catalog(&request.catalog, &request.offering) {
            for finding in findings {
                trace.warn(Phase::Catalog, finding.message);
            }
        }

        let index = CatalogIndex::build(&request.catalog, &request.offering, trace);
        if index.is_empty() {
            return Ok(Outcome::Failed(GenerationFailure::invalid_input(
                "catalog has no schedulable courses",
            )));
        }
        if index.offered().next().is_none() {
            return Ok(Outcome::Failed(GenerationFailure::invalid_input(format!(
                "no sections offered for {semester}"
            ))));
        }

        let mut scorer = ChainScorer::new(index.courses(), &config.chain);
        let eligible = EligibilityFilter::new(config, student, preferences, semester).filter(&index, &mut scorer, trace);
        if !eligible.failed_unoffered.is_empty() {
            return Ok(Outcome::Failed(GenerationFailure::unsatisfiable(
                format!(
                    "failed courses with no section in {semester}: {}",
                    eligible.failed_unoffered.join(", ")
                ),
                Vec::new(),
            )));
        }
        if eligible.is_empty() {
            return Ok(Outcome::Failed(GenerationFailure::unsatisfiable(
                "no offered course is eligible",
                Vec::new(),
            )));
        }

        let context = PriorityContext::new(&config.priority, preferences)
            .with_chain_scores(&mut scorer, eligible.all().map(|c| c.course_id.as_str()));
        let ranked = self.engine.rank(&eligible, &index, &context, trace)?;

        let builder = ScheduleBuilder::new(config, student, preferences, &index, semester);
        let built = builder.run(&ranked, trace);
        let Some((schedule, _)) = built.accepted else {
            let message = format!(
                "no credit target between {} and {} produced a valid schedule",
                config.credit_bounds(&semester).min,
                config.credit_bounds(&semester).max
            );
            return Ok(Outcome::Failed(GenerationFailure::unsatisfiable(message, built.attempts)));
        };

        let validation = validate_schedule(&schedule, student, &index, config);
        if !validation.valid {
            return Err(GenerationError::internal(format!(
                "final validation rejected an accepted schedule: {}",
                validation.reasons.join("; ")
            )));
        }

        let metrics = ScheduleMetrics::calculate(&schedule, student, preferences, &index);
        Ok(Outcome::Generated {
            schedule,
            metrics,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::SectionOffering;
    use crate::models::{
        Category, Course, CourseRule, Grade, Preferences, Section, Semester, StudentRecord, Term,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DAYS: [&str; 3] = ["Sunday-Tuesday-Thursday", "Monday-Wednesday", "Saturday"];

    fn sem() -> Semester {
        Semester::new(2024, Term::First)
    }

    /// Sections on distinct slots: slot i → day pattern i % 3, hour 8 + i / 3.
    fn slot(i: usize) -> Section {
        let hour = 8 + i / DAYS.len();
        Section::parse(
            "1",
            DAYS[i % DAYS.len()],
            &format!("{hour:02}:00 - {hour:02}:50"),
        )
        .unwrap()
    }

    /// 20 courses, no prerequisites, every section in its own slot.
    fn twenty_course_request(student: StudentRecord, preferences: Option<Preferences>) -> GenerationRequest {
        let mut catalog = Vec::new();
        let mut offering = SectionOffering::new(sem());
        for i in 0..20 {
            let category = match i % 5 {
                0 | 1 => Category::MajorMandatory,
                2 => Category::CollegeMandatory,
                3 => Category::MajorElective,
                _ => Category::UniversityMandatory,
            };
            let mut course = Course::new(format!("C{i:02}"), category).with_credits(3);
            if i % 4 == 0 {
                course = course.with_lab();
            }
            offering = offering.with_sections(course.id.clone(), vec![slot(i)]);
            catalog.push(course);
        }
        GenerationRequest {
            catalog,
            offering,
            student,
            preferences,
        }
    }

    #[test]
    fn test_fresh_student_generates_valid_schedule() {
        let request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        let report = ScheduleGenerator::default().generate(&request).unwrap();

        let schedule = report.schedule().expect("schedule generated");
        assert!((12..=18).contains(&schedule.total_credits()));
        assert_eq!(schedule.total_credits(), 15);
        assert!(schedule.conflicting_pairs().is_empty());
        assert!(schedule.basic_count() <= 2);
        assert!(schedule.lab_count() >= 1);
        assert!(report.metrics().is_some());
        assert!(report.trace.phase_entries(Phase::Metrics).count() >= 1);
    }

    #[test]
    fn test_failed_courses_always_included() {
        let student = StudentRecord::new("s1")
            .with_attempt("C05", Grade::F, "2023-2")
            .with_attempt("C07", Grade::DMinus, "2023-2");
        let request = twenty_course_request(student, Some(Preferences::new(15)));
        let report = ScheduleGenerator::default().generate(&request).unwrap();
        let schedule = report.schedule().unwrap();
        assert!(schedule.contains("C05"));
        assert!(schedule.contains("C07"));
    }

    #[test]
    fn test_conflicting_failed_courses_report_failure() {
        let mut request = twenty_course_request(
            StudentRecord::new("s1")
                .with_attempt("C01", Grade::F, "2023-2")
                .with_attempt("C02", Grade::F, "2023-2"),
            Some(Preferences::new(15)),
        );
        // Put C02 in C01's slot.
        let slot_of_c01 = slot(1);
        for offered in &mut request.offering.courses {
            if offered.course_id == "C02" {
                offered.sections = vec![slot_of_c01.clone()];
            }
        }

        let report = ScheduleGenerator::default().generate(&request).unwrap();
        let failure = report.failure().expect("must fail");
        assert_eq!(failure.kind, FailureKind::Unsatisfiable);
        assert_eq!(failure.attempts.len(), 7);
        assert!(failure.attempts[0].reasons[0].contains("C02"));
        assert!(report.schedule().is_none());
    }

    #[test]
    fn test_unoffered_failed_course_reports_failure() {
        let mut request = twenty_course_request(
            StudentRecord::new("s1").with_attempt("RETAKE", Grade::F, "2023-2"),
            Some(Preferences::new(15)),
        );
        request
            .catalog
            .push(Course::new("RETAKE", Category::MajorMandatory).with_credits(3));

        let report = ScheduleGenerator::default().generate(&request).unwrap();
        assert!(report.schedule().is_none());
        let failure = report.failure().expect("must fail");
        assert_eq!(failure.kind, FailureKind::Unsatisfiable);
        assert!(failure.message.contains("RETAKE"));
        assert!(report.trace.warnings().iter().any(|w| w.contains("RETAKE")));
    }

    #[test]
    fn test_at_most_one_general_mandatory() {
        let mut request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        for (i, id) in ["GEN1", "GEN2"].into_iter().enumerate() {
            request
                .catalog
                .push(Course::new(id, Category::GeneralMandatory).with_credits(3));
            request.offering = request.offering.clone().with_sections(id, vec![slot(20 + i)]);
        }
        let report = ScheduleGenerator::default().generate(&request).unwrap();
        let schedule = report.schedule().unwrap();
        assert!(schedule.count_in(Category::GeneralMandatory) <= 1);
        assert!(schedule.basic_count() <= 2);
    }

    #[test]
    fn test_input_failures() {
        let generator = ScheduleGenerator::default();

        let out_of_range = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(20)));
        let failure = generator.generate(&out_of_range).unwrap().failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidInput);
        assert!(failure.message.contains("20"));

        let missing = twenty_course_request(StudentRecord::new("s1"), None);
        let failure = generator.generate(&missing).unwrap().failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidInput);

        let empty = GenerationRequest::new(
            vec![],
            SectionOffering::new(sem()),
            StudentRecord::new("s1"),
            Preferences::new(15),
        );
        let failure = generator.generate(&empty).unwrap().failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidInput);

        let mut unoffered = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        unoffered.offering.courses.clear();
        let failure = generator.generate(&unoffered).unwrap().failure().cloned().unwrap();
        assert_eq!(failure.kind, FailureKind::InvalidInput);
        assert!(failure.message.contains("2024-1"));
    }

    #[test]
    fn test_summer_term_bounds() {
        let mut request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        request.offering.semester = Semester::new(2024, Term::Summer);
        let report = ScheduleGenerator::default().generate(&request).unwrap();
        let schedule = report.schedule().unwrap();
        assert_eq!(schedule.total_credits(), 9);
        assert!(schedule.semester.is_summer());
    }

    #[test]
    fn test_special_rule_excludes_course() {
        let config = GeneratorConfig::default().with_rule("C00", CourseRule::MinEarnedCredits { credits: 60 });
        let request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        let report = ScheduleGenerator::new(config).generate(&request).unwrap();
        assert!(!report.schedule().unwrap().contains("C00"));
        assert!(report
            .trace
            .phase_entries(Phase::Eligibility)
            .any(|e| e.message.contains("C00")));
    }

    #[test]
    fn test_cyclic_catalog_still_generates() {
        let mut request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        request.catalog[0].prerequisites.push("C01".into());
        request.catalog[1].prerequisites.push("C00".into());
        let report = ScheduleGenerator::default().generate(&request).unwrap();
        assert!(report.is_generated());
        assert!(report.trace.warnings().iter().any(|w| w.contains("Circular")));
    }

    #[test]
    fn test_generate_json_round_trip() {
        let request = twenty_course_request(StudentRecord::new("s1"), Some(Preferences::new(15)));
        let json = serde_json::to_string(&request).unwrap();
        let generator = ScheduleGenerator::default();
        let from_json = generator.generate_json(&json).unwrap();
        let direct = generator.generate(&request).unwrap();
        assert_eq!(from_json.schedule(), direct.schedule());

        let value = serde_json::to_value(&direct).unwrap();
        assert_eq!(value["outcome"]["status"], "generated");

        assert!(matches!(
            generator.generate_json("{not json"),
            Err(GenerationError::Document(_))
        ));
    }

    /// Randomized catalogs: every generated schedule must satisfy the
    /// validator and the hard properties directly.
    #[test]
    fn test_randomized_builder_validator_agreement() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = ScheduleGenerator::default();
        let mut generated = 0;

        for round in 0..60 {
            let n = rng.random_range(8..30);
            let mut catalog = Vec::new();
            let mut offering = SectionOffering::new(sem());
            let mut student = StudentRecord::new(format!("r{round}"));

            for i in 0..n {
                let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
                let mut course = Course::new(format!("R{i:02}"), category).with_credits(rng.random_range(1..=4));
                if rng.random_bool(0.3) {
                    course = course.with_lab();
                }
                if i > 0 && rng.random_bool(0.3) {
                    course = course.with_prerequisite(format!("R{:02}", rng.random_range(0..i)));
                }
                let sections = (0..rng.random_range(1..=3))
                    .map(|s| {
                        let start = rng.random_range(8..18) * 60 + [0, 30][rng.random_range(0..2)];
                        let len = [50, 75, 90][rng.random_range(0..3)];
                        Section::parse(
                            &format!("{}", s + 1),
                            DAYS[rng.random_range(0..DAYS.len())],
                            &format!(
                                "{:02}:{:02} - {:02}:{:02}",
                                start / 60,
                                start % 60,
                                (start + len) / 60,
                                (start + len) % 60
                            ),
                        )
                        .unwrap()
                    })
                    .collect();
                offering = offering.with_sections(course.id.clone(), sections);
                if rng.random_bool(0.15) {
                    let grade = [Grade::A, Grade::C, Grade::F, Grade::P][rng.random_range(0..4)];
                    student = student.with_attempt(course.id.clone(), grade, "2023-1");
                }
                catalog.push(course);
            }

            let request = GenerationRequest::new(
                catalog,
                offering,
                student.clone(),
                Preferences::new(rng.random_range(12..=18)),
            );
            let report = generator.generate(&request).unwrap();
            if let Some(schedule) = report.schedule() {
                generated += 1;
                let index = CatalogIndex::build(&request.catalog, &request.offering, &mut RunTrace::new("x"));
                let verdict = validate_schedule(schedule, &student, &index, generator.config());
                assert!(verdict.valid, "round {round}: {:?}", verdict.reasons);
                assert!(schedule.conflicting_pairs().is_empty());
                assert!((12..=18).contains(&schedule.total_credits()));
                assert!(schedule.count_in(Category::GeneralMandatory) <= 1);
                assert!(schedule.basic_count() <= 2);
                for entry in index.offered() {
                    if student.has_failed(entry.id(), entry.course.category) {
                        assert!(schedule.contains(entry.id()), "round {round}: {} dropped", entry.id());
                    }
                }
            } else {
                assert!(report.failure().is_some());
            }
        }
        assert!(generated > 0);
    }
}
