//! Credit distribution and technical subcategory progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::CatalogIndex;
use crate::models::{Category, Schedule, StudentRecord, Subcategory};

/// Share of the schedule's credit hours by category and technical
/// subcategory, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub categories: BTreeMap<Category, f64>,
    pub subcategories: BTreeMap<Subcategory, f64>,
}

impl Distribution {
    pub fn calculate(schedule: &Schedule) -> Self {
        let total = schedule.total_credits();
        let percent = |credits: u32| {
            if total == 0 {
                0.0
            } else {
                f64::from(credits) / f64::from(total) * 100.0
            }
        };

        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let credits = schedule
                    .courses
                    .iter()
                    .filter(|c| c.course.category == category)
                    .map(|c| c.credits)
                    .sum();
                (category, percent(credits))
            })
            .collect();

        let subcategories = Subcategory::TECHNICAL
            .iter()
            .map(|sub| {
                let credits = schedule
                    .courses
                    .iter()
                    .filter(|c| c.course.subcategory.as_ref() == Some(sub))
                    .map(|c| c.credits)
                    .sum();
                (sub.clone(), percent(credits))
            })
            .collect();

        Self {
            categories,
            subcategories,
        }
    }
}

/// Progress through one technical subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryProgress {
    pub subcategory: Subcategory,
    /// Catalog courses in the subcategory.
    pub total: usize,
    pub passed: usize,
    /// Scheduled this term and not already passed.
    pub scheduled: usize,
    pub remaining: usize,
}

impl SubcategoryProgress {
    /// Progress for each technical subcategory, combining history with the
    /// schedule.
    pub fn calculate_all(schedule: &Schedule, student: &StudentRecord, index: &CatalogIndex) -> Vec<Self> {
        Subcategory::TECHNICAL
            .iter()
            .map(|sub| {
                let mut progress = Self {
                    subcategory: sub.clone(),
                    total: 0,
                    passed: 0,
                    scheduled: 0,
                    remaining: 0,
                };
                for entry in index.iter().filter(|e| e.course.subcategory.as_ref() == Some(sub)) {
                    progress.total += 1;
                    if student.has_passed(entry.id(), entry.course.category) {
                        progress.passed += 1;
                    } else if schedule.contains(entry.id()) {
                        progress.scheduled += 1;
                    } else {
                        progress.remaining += 1;
                    }
                }
                progress
            })
            .collect()
    }

    /// Fraction passed or scheduled, 0..=1.
    pub fn completion(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed + self.scheduled) as f64 / self.total as f64
        }
    }
}
