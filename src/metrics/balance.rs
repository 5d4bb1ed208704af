//! Category balance of a schedule.
//!
//! Each category (and each technical subcategory) has a target course-count
//! range. A count inside the range scores 100; every course short of the
//! minimum costs 20 points and every course over the maximum costs 60
//! (overshooting is three times worse). A basic category holding more than
//! one course scores 0. The overall balance blends 70% category level and
//! 30% subcategory level.

use serde::{Deserialize, Serialize};

use crate::models::{Category, Schedule, Subcategory};

const UNDER_PENALTY: f64 = 20.0;
const OVER_PENALTY: f64 = UNDER_PENALTY * 3.0;
const CATEGORY_SHARE: f64 = 0.7;
const SUBCATEGORY_SHARE: f64 = 0.3;

/// Target course-count range for a category.
pub fn category_target(category: Category) -> (usize, usize) {
    match category {
        Category::MajorMandatory => (3, 4),
        Category::CollegeMandatory => (1, 2),
        Category::MajorElective => (0, 2),
        Category::UniversityMandatory | Category::UniversityElective | Category::GeneralMandatory => (0, 1),
    }
}

/// Target course-count range for each technical subcategory.
pub const SUBCATEGORY_TARGET: (usize, usize) = (0, 2);

/// Score for a count against a `(min, max)` range.
pub fn range_score(count: usize, (min, max): (usize, usize)) -> f64 {
    let score = if count < min {
        100.0 - UNDER_PENALTY * (min - count) as f64
    } else if count > max {
        100.0 - OVER_PENALTY * (count - max) as f64
    } else {
        100.0
    };
    score.max(0.0)
}

/// Balance of one category or subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBalance {
    pub group: String,
    pub count: usize,
    pub min: usize,
    pub max: usize,
    pub score: f64,
}

/// Balance of a whole schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    /// 0..=100
    pub score: f64,
    pub category_score: f64,
    pub subcategory_score: f64,
    pub categories: Vec<GroupBalance>,
    pub subcategories: Vec<GroupBalance>,
}

fn mean(groups: &[GroupBalance]) -> f64 {
    if groups.is_empty() {
        0.0
    } else {
        groups.iter().map(|g| g.score).sum::<f64>() / groups.len() as f64
    }
}

impl BalanceReport {
    pub fn calculate(schedule: &Schedule) -> Self {
        let categories: Vec<GroupBalance> = Category::ALL
            .iter()
            .map(|&category| {
                let count = schedule.count_in(category);
                let (min, max) = category_target(category);
                let score = if category.is_basic() && count > 1 {
                    0.0
                } else {
                    range_score(count, (min, max))
                };
                GroupBalance {
                    group: category.label().to_string(),
                    count,
                    min,
                    max,
                    score,
                }
            })
            .collect();

        let subcategories: Vec<GroupBalance> = Subcategory::TECHNICAL
            .iter()
            .map(|sub| {
                let count = schedule
                    .courses
                    .iter()
                    .filter(|c| c.course.subcategory.as_ref() == Some(sub))
                    .count();
                let (min, max) = SUBCATEGORY_TARGET;
                GroupBalance {
                    group: sub.label().to_string(),
                    count,
                    min,
                    max,
                    score: range_score(count, (min, max)),
                }
            })
            .collect();

        let category_score = mean(&categories);
        let subcategory_score = mean(&subcategories);
        Self {
            score: CATEGORY_SHARE * category_score + SUBCATEGORY_SHARE * subcategory_score,
            category_score,
            subcategory_score,
            categories,
            subcategories,
        }
    }
}
