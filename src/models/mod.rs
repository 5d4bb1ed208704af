//! Course-scheduling domain models.
//!
//! Provides the input documents (catalog courses, section offerings,
//! student record, preferences) and the output schedule.
//!
//! # Domain Mappings
//!
//! | course-scheduler | Registrar term |
//! |------------------|----------------|
//! | Course | Catalog course |
//! | Section | Offered class section |
//! | StudentRecord | Transcript |
//! | Schedule | Registration plan |

mod category;
mod course;
mod preferences;
mod schedule;
mod section;
mod semester;
mod student;

pub use category::{Category, Subcategory};
pub use course::{Course, CourseDetails, CourseRule, ExamType};
pub use preferences::{BreakPreference, DayPreference, Preferences, Rating, SubcategoryRatings};
pub use schedule::{Schedule, ScheduleStatus, ScheduledCourse};
pub use section::{DayPattern, Section, TimeRange};
pub use semester::{Semester, Term};
pub use student::{CourseAttempt, Grade, StudentRecord};
