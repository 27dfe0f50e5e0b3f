//! Ranked queries over a computed modelization.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::FeaturesMaximizationMetric;
use crate::error::FmcError;

/// Metric used to order ranking results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Contrast,
    Fmeasure,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Contrast => "contrast",
            SortBy::Fmeasure => "fmeasure",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = FmcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contrast" => Ok(SortBy::Contrast),
            "fmeasure" => Ok(SortBy::Fmeasure),
            other => Err(FmcError::InvalidSortOption(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    /// Keep only activated (feature, class) pairs.
    pub activation_only: bool,
    pub sort_by: SortBy,
    /// Cap on the number of returned names. `None` returns everything.
    pub max_number: Option<usize>,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            activation_only: true,
            sort_by: SortBy::Contrast,
            max_number: None,
        }
    }
}

impl RankingOptions {
    /// Every candidate, activated or not.
    pub fn all() -> Self {
        Self {
            activation_only: false,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn limited_to(mut self, max_number: usize) -> Self {
        self.max_number = Some(max_number);
        self
    }
}

/// Sort `(metric, name)` pairs by metric then name, both descending, and cap.
fn rank<'a>(mut candidates: Vec<(f64, &'a str)>, max_number: Option<usize>) -> Vec<&'a str> {
    candidates.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.cmp(a.1))
    });
    let keep = max_number.unwrap_or(candidates.len());
    candidates.into_iter().take(keep).map(|(_, name)| name).collect()
}

impl FeaturesMaximizationMetric {
    /// Classes for which `feature` is the most relevant, best first.
    ///
    /// Ties on the metric are broken by descending class name.
    ///
    /// # Errors
    ///
    /// [`FmcError::UnknownFeature`] if `feature` is not in the vocabulary.
    pub fn get_most_activated_classes_by_feature(
        &self,
        feature: &str,
        options: &RankingOptions,
    ) -> Result<Vec<&str>, FmcError> {
        let f = self
            .features
            .position(feature)
            .ok_or_else(|| FmcError::UnknownFeature(feature.to_string()))?;

        let metric = match options.sort_by {
            SortBy::Contrast => self.contrast(),
            SortBy::Fmeasure => self.fmeasure(),
        };
        let activation = self.activation();

        let candidates = self
            .classes
            .names()
            .iter()
            .enumerate()
            .filter(|(c, _)| !options.activation_only || activation.at(f, *c))
            .map(|(c, classe)| (metric.at(f, c), classe.as_str()))
            .collect();

        Ok(rank(candidates, options.max_number))
    }

    /// Features which are the most relevant for `classe`, best first.
    ///
    /// Ties on the metric are broken by descending feature name.
    ///
    /// # Errors
    ///
    /// [`FmcError::UnknownClasse`] if `classe` is not in the class universe.
    pub fn get_most_active_features_by_classe(
        &self,
        classe: &str,
        options: &RankingOptions,
    ) -> Result<Vec<&str>, FmcError> {
        let c = self
            .classes
            .position(classe)
            .ok_or_else(|| FmcError::UnknownClasse(classe.to_string()))?;

        let metric = match options.sort_by {
            SortBy::Contrast => self.contrast(),
            SortBy::Fmeasure => self.fmeasure(),
        };
        let activation = self.activation();

        let candidates = self
            .features
            .names()
            .iter()
            .enumerate()
            .filter(|(f, _)| !options.activation_only || activation.at(*f, c))
            .map(|(f, feature)| (metric.at(f, c), feature.as_str()))
            .collect();

        Ok(rank(candidates, options.max_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sort_options() {
        assert_eq!("contrast".parse::<SortBy>(), Ok(SortBy::Contrast));
        assert_eq!("fmeasure".parse::<SortBy>(), Ok(SortBy::Fmeasure));
        assert_eq!(
            "UNKNOWN".parse::<SortBy>(),
            Err(FmcError::InvalidSortOption("UNKNOWN".to_string()))
        );
        assert_eq!(SortBy::Fmeasure.to_string(), "fmeasure");
    }

    #[test]
    fn ties_break_on_descending_name() {
        let ranked = rank(vec![(0.5, "a"), (0.9, "m"), (0.5, "z"), (0.5, "b")], None);
        assert_eq!(ranked, vec!["m", "z", "b", "a"]);
    }

    #[test]
    fn cap_larger_than_candidates_is_harmless() {
        let ranked = rank(vec![(1.0, "a"), (2.0, "b")], Some(10));
        assert_eq!(ranked, vec!["b", "a"]);
        assert!(rank(vec![(1.0, "a")], Some(0)).is_empty());
    }

    #[test]
    fn default_options_keep_activated_by_contrast() {
        let opts = RankingOptions::default();
        assert!(opts.activation_only);
        assert_eq!(opts.sort_by, SortBy::Contrast);
        assert_eq!(opts.max_number, None);

        let opts = RankingOptions::all().sorted_by(SortBy::Fmeasure).limited_to(1);
        assert!(!opts.activation_only);
        assert_eq!(opts.max_number, Some(1));
    }
}
