use serde::{Deserialize, Serialize};

use crate::domain::{
    models::{
        CompletionSubmission, FormType, MaintenanceId, RatedCategory, RatedSubCategory, Rating,
        RatingCategory,
    },
    RatingError,
};

/// Categories shown per page of the rating form.
pub const PAGE_SIZE: usize = 5;

/// How direct-rated categories are weighted in [`RatingAggregator::final_score`].
///
/// `Compatible` reproduces the score the backend has always received: the
/// sub-category branch weighs by `weight / 100` while the direct branch weighs
/// by the raw `weight`, so direct categories dominate mixed trees.
/// `Normalized` uses `weight / 100` in both branches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    #[default]
    Compatible,
    Normalized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubRatingEntry {
    pub sub_id: i64,
    pub title: String,
    pub weight_percentage: f64,
    pub rating: Option<Rating>,
}

/// Working rating state for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub category_id: i64,
    pub title: String,
    pub weight_percentage: f64,
    pub rating: Option<Rating>,
    pub sub_entries: Vec<SubRatingEntry>,
}

impl RatingEntry {
    fn from_category(category: &RatingCategory) -> Self {
        Self {
            category_id: category.id,
            title: category.title.clone(),
            weight_percentage: category.weight_percentage,
            rating: None,
            sub_entries: category
                .sub_categories
                .iter()
                .map(|sub| SubRatingEntry {
                    sub_id: sub.id,
                    title: sub.title.clone(),
                    weight_percentage: sub.weight_percentage,
                    rating: None,
                })
                .collect(),
        }
    }

    pub fn has_sub_categories(&self) -> bool {
        !self.sub_entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        if self.has_sub_categories() {
            self.sub_entries.iter().all(|sub| sub.rating.is_some())
        } else {
            self.rating.is_some()
        }
    }

    /// Weighted mean of the rated sub-entries. Unrated ones are left out of
    /// both sums rather than counted as zero.
    fn sub_score(&self) -> Option<f64> {
        let (weighted, weight) = self
            .sub_entries
            .iter()
            .filter_map(|sub| {
                sub.rating
                    .map(|r| (sub.weight_percentage * r.value(), sub.weight_percentage))
            })
            .fold((0.0, 0.0), |(acc_w, acc_d), (w, d)| (acc_w + w, acc_d + d));

        if weight == 0.0 {
            None
        } else {
            Some(weighted / weight)
        }
    }

    fn to_rated(&self) -> Option<RatedCategory> {
        if self.has_sub_categories() {
            let subs = self
                .sub_entries
                .iter()
                .map(|sub| {
                    sub.rating.map(|rating| RatedSubCategory {
                        sub_id: sub.sub_id,
                        weight_percentage: sub.weight_percentage,
                        rating,
                    })
                })
                .collect::<Option<Vec<_>>>()?;
            Some(RatedCategory {
                category_id: self.category_id,
                weight_percentage: self.weight_percentage,
                rating: None,
                sub_categories: Some(subs),
            })
        } else {
            Some(RatedCategory {
                category_id: self.category_id,
                weight_percentage: self.weight_percentage,
                rating: Some(self.rating?),
                sub_categories: None,
            })
        }
    }
}

/// The rating tree for one maintenance form, plus its page cursor.
///
/// Lives as long as the form is open and is never persisted.
#[derive(Debug, Clone)]
pub struct RatingAggregator {
    form_type: FormType,
    entries: Vec<RatingEntry>,
    current_page: usize,
    score_mode: ScoreMode,
}

impl RatingAggregator {
    /// Keep only the catalog categories that belong to `form_type`, unrated.
    pub fn new(catalog: &[RatingCategory], form_type: FormType) -> Self {
        let entries = catalog
            .iter()
            .filter(|category| form_type.keeps(category))
            .map(RatingEntry::from_category)
            .collect();

        Self {
            form_type,
            entries,
            current_page: 0,
            score_mode: ScoreMode::default(),
        }
    }

    pub fn with_score_mode(mut self, score_mode: ScoreMode) -> Self {
        self.score_mode = score_mode;
        self
    }

    pub fn form_type(&self) -> &FormType {
        &self.form_type
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, category_id: i64) -> Result<&mut RatingEntry, RatingError> {
        self.entries
            .iter_mut()
            .find(|e| e.category_id == category_id)
            .ok_or(RatingError::UnknownCategory(category_id))
    }

    pub fn rate_category(&mut self, category_id: i64, rating: Rating) -> Result<(), RatingError> {
        let entry = self.entry_mut(category_id)?;
        if entry.has_sub_categories() {
            return Err(RatingError::HasSubCategories(category_id));
        }
        entry.rating = Some(rating);
        Ok(())
    }

    pub fn rate_sub_category(
        &mut self,
        category_id: i64,
        sub_id: i64,
        rating: Rating,
    ) -> Result<(), RatingError> {
        let entry = self.entry_mut(category_id)?;
        if !entry.has_sub_categories() {
            return Err(RatingError::NoSubCategories(category_id));
        }
        let sub = entry
            .sub_entries
            .iter_mut()
            .find(|s| s.sub_id == sub_id)
            .ok_or(RatingError::UnknownSubCategory {
                category_id,
                sub_id,
            })?;
        sub.rating = Some(rating);
        Ok(())
    }

    pub fn is_complete(&self, category_id: i64) -> Result<bool, RatingError> {
        self.entries
            .iter()
            .find(|e| e.category_id == category_id)
            .map(RatingEntry::is_complete)
            .ok_or(RatingError::UnknownCategory(category_id))
    }

    /// Titles of every incomplete category, in display order.
    pub fn incomplete_categories(&self) -> Vec<String> {
        incomplete_titles(&self.entries)
    }

    pub fn is_fully_rated(&self) -> bool {
        self.entries.iter().all(RatingEntry::is_complete)
    }

    /// Normalized score in `[0, 5]`; `0` when nothing contributes.
    pub fn final_score(&self) -> f64 {
        let mut total = 0.0;
        let mut weight = 0.0;

        for entry in &self.entries {
            if entry.has_sub_categories() {
                let Some(sub_score) = entry.sub_score() else {
                    continue;
                };
                let share = entry.weight_percentage / 100.0;
                total += sub_score * share;
                weight += share;
            } else if let Some(rating) = entry.rating {
                let share = match self.score_mode {
                    ScoreMode::Compatible => entry.weight_percentage,
                    ScoreMode::Normalized => entry.weight_percentage / 100.0,
                };
                total += share * rating.value();
                weight += share;
            }
        }

        if weight == 0.0 {
            0.0
        } else {
            total / weight
        }
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    pub fn page_count(&self) -> usize {
        self.entries.len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.page_count()
    }

    pub fn page_entries(&self) -> &[RatingEntry] {
        let start = (self.current_page * PAGE_SIZE).min(self.entries.len());
        let end = (start + PAGE_SIZE).min(self.entries.len());
        &self.entries[start..end]
    }

    /// Advance one page, provided everything on the current page is rated.
    pub fn next_page(&mut self) -> Result<usize, RatingError> {
        if self.is_last_page() {
            return Err(RatingError::NoMorePages);
        }
        let titles = incomplete_titles(self.page_entries());
        if !titles.is_empty() {
            return Err(RatingError::PageIncomplete { titles });
        }
        self.current_page += 1;
        Ok(self.current_page)
    }

    pub fn previous_page(&mut self) -> usize {
        self.current_page = self.current_page.saturating_sub(1);
        self.current_page
    }

    /// The submit action is offered on the last page once every category,
    /// not just the ones on that page, is complete.
    pub fn can_submit(&self) -> bool {
        self.is_last_page() && self.is_fully_rated()
    }

    /// Build the completion payload, refusing while anything is unrated.
    pub fn build_submission(
        &self,
        maintenance_id: MaintenanceId,
        temporary: bool,
    ) -> Result<CompletionSubmission, RatingError> {
        let titles = self.incomplete_categories();
        if !titles.is_empty() {
            return Err(RatingError::Incomplete { titles });
        }

        let rating_data = self
            .entries
            .iter()
            .filter_map(RatingEntry::to_rated)
            .collect();

        Ok(CompletionSubmission {
            temporary,
            maintenance_id,
            rating_data,
        })
    }
}

fn incomplete_titles(entries: &[RatingEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| !e.is_complete())
        .map(|e| e.title.clone())
        .collect()
}
