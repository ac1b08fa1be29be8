//! Collection statistics service
//!
//! Every computation takes the books to summarise and skips the ones missing
//! the fields it needs.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{config::AnalyticsConfig, models::Book};

#[derive(Clone)]
pub struct AnalyticsService {
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Mean price over books that have one
    pub fn average_price(&self, books: &[Book]) -> Option<Decimal> {
        let prices: Vec<Decimal> = books.iter().filter_map(|b| b.price_usd).collect();
        if prices.is_empty() {
            return None;
        }
        let total: Decimal = prices.iter().sum();
        Some(total / Decimal::from(prices.len()))
    }

    /// Median price per genre code
    pub fn median_price_by_genre(&self, books: &[Book]) -> BTreeMap<i32, Decimal> {
        let mut by_genre: BTreeMap<i32, Vec<Decimal>> = BTreeMap::new();
        for book in books {
            if let (Some(genre), Some(price)) = (book.genre, book.price_usd) {
                by_genre.entry(genre).or_default().push(price);
            }
        }

        by_genre
            .into_iter()
            .filter_map(|(genre, prices)| median(prices).map(|m| (genre, m)))
            .collect()
    }

    /// Genre with the most books published in `year`. Ties go to the lowest genre code.
    pub fn most_popular_genre(&self, books: &[Book], year: i32) -> Option<i32> {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for book in books.iter().filter(|b| b.publication_year == Some(year)) {
            if let Some(genre) = book.genre {
                *counts.entry(genre).or_default() += 1;
            }
        }

        let max = counts.values().copied().max()?;
        counts.into_iter().find(|(_, count)| *count == max).map(|(genre, _)| genre)
    }

    /// Highest rated books with at least `min_ratings` ratings, best first
    pub fn top_rated(&self, books: &[Book], min_ratings: u64, limit: usize) -> Vec<Book> {
        let mut rated: Vec<(&Book, f64)> = books
            .iter()
            .filter(|b| b.ratings_count.is_some_and(|c| c >= min_ratings))
            .filter_map(|b| b.average_rating.map(|r| (b, r)))
            .collect();
        rated.sort_by(|a, b| b.1.total_cmp(&a.1));

        rated.into_iter().take(limit).map(|(b, _)| b.clone()).collect()
    }

    /// [`AnalyticsService::top_rated`] with the configured threshold and limit
    pub fn top_rated_default(&self, books: &[Book]) -> Vec<Book> {
        self.top_rated(books, self.config.min_ratings, self.config.top_limit)
    }

    /// `rating * ln(1 + ratings_count) / price` per book id, highest first
    pub fn value_scores(&self, books: &[Book], limit: usize) -> IndexMap<String, f64> {
        let mut scores: Vec<(&str, f64)> = books
            .iter()
            .filter_map(|b| {
                let rating = b.average_rating?;
                let count = b.ratings_count?;
                let price = b.price_usd.filter(|p| p.is_sign_positive() && !p.is_zero())?;
                let price = price.to_f64()?;
                Some((b.book_id.as_str(), rating * (count as f64).ln_1p() / price))
            })
            .filter(|(_, score)| score.is_finite())
            .collect();
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));

        scores
            .into_iter()
            .take(limit)
            .map(|(id, score)| (id.to_string(), score))
            .collect()
    }

    /// [`AnalyticsService::value_scores`] with the configured limit
    pub fn value_scores_default(&self, books: &[Book]) -> IndexMap<String, f64> {
        self.value_scores(books, self.config.value_score_limit)
    }
}

fn median(mut values: Vec<Decimal>) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values.sort();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / Decimal::TWO)
    } else {
        Some(values[mid])
    }
}
