//! Statistical utilities for geoskill reports.
//!
//! This crate provides the small set of statistics the analyses need:
//!
//! - **Descriptive statistics**: count, min, max, mean, median, variance, standard deviation
//! - **Percentiles**: nearest-rank percentile lookup
//! - **Histograms**: equal-width bins over an explicit or data-derived range
//! - **Rates and means**: accumulators that report "no data" instead of NaN
//! - **Class breaks**: equidistant, nested means and Jenks natural breaks
//!
//! Every computation over an empty dataset yields `None`.
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Histogram construction
//! - [`summary`]: Descriptive statistics, percentiles and histogram in one value
//! - [`rate`]: Success-rate and mean accumulators
//! - [`classification`]: Class-break computation for grouping values
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use geoskill_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert!(DescriptiveStats::new([]).is_none());
//! ```
//!
//! ## Accumulating a success rate
//!
//! ```
//! use geoskill_stats::rate::Rate;
//!
//! let rate = [true, false, true, true].into_iter().collect::<Rate>();
//! assert_eq!(rate.value(), Some(0.75));
//! assert_eq!(Rate::default().value(), None);
//! ```
//!
//! ## Computing class breaks
//!
//! ```
//! use geoskill_stats::classification::ClassificationMethod;
//!
//! let values = [1.0, 1.5, 2.0, 10.0, 11.0, 12.0];
//! let breaks = ClassificationMethod::Jenks.breaks(&values, 2).unwrap();
//! assert_eq!(breaks.bounds(), &[1.0, 10.0, 12.0]);
//! assert_eq!(breaks.classify(1.7), Some(0));
//! assert_eq!(breaks.classify(10.5), Some(1));
//! ```

pub mod classification;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod rate;
pub mod summary;
